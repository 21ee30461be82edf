//! Shared helpers for the integration suites.

use std::path::PathBuf;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use tfplan_core::{build_forest, Forest, NodeId};

/// Path of a plan fixture under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// Read a plan fixture as text.
pub async fn fixture(name: &str) -> Result<String> {
    let path = fixture_path(name);
    tokio::fs::read_to_string(&path)
        .await
        .wrap_err_with(|| format!("reading fixture {}", path.display()))
}

/// Build the forest for a plan fixture.
pub async fn fixture_forest(name: &str) -> Result<Forest> {
    Ok(build_forest(&fixture(name).await?))
}

/// Every fixture, for suites that check properties across all of them.
pub const FIXTURES: &[&str] = &[
    "create.json",
    "replace.json",
    "drift.json",
    "moved.json",
    "mixed.json",
];

/// Install a debug subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Texts of the root nodes, in order.
pub fn root_texts(forest: &Forest) -> Vec<String> {
    forest
        .roots()
        .iter()
        .map(|&id| forest.node(id).text.clone())
        .collect()
}

/// Texts of a node's direct children.
pub fn child_texts(forest: &Forest, id: NodeId) -> Vec<String> {
    forest
        .node(id)
        .children()
        .iter()
        .map(|&child| forest.node(child).text.clone())
        .collect()
}
