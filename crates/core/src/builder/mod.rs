//! Plan JSON to annotated diff forest.
//!
//! The builder is a pure function of its input. Roots come out in a fixed
//! order: drifted resources, a separator, planned resources (moved ones
//! last), notes about the planning run, and the summary line.

mod attributes;
pub mod value;

use std::fmt::Write as _;

use tracing::{debug, warn};

pub use value::{contains_unknown, effectively_equal, format_value, is_effectively_empty};

use crate::plan::{action_reason_phrase, decode_plan, ChangeType, PlanDocument, ResourceChange};
use crate::tree::{Forest, NodeDraft, NodeKind};

pub const NO_CHANGES: &str = "No changes. Your infrastructure matches the configuration.";
pub const NULL_ONLY_NOTE: &str = "# (all attributes unchanged; only null representation differs)";
pub const ERRORED_NOTE: &str = "# Warning: the plan run reported errors; the changes below may be incomplete.";
pub const INCOMPLETE_NOTE: &str =
    "# Note: this plan is incomplete; another plan and apply cycle will be needed to converge.";

/// Resource counts reported by the summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanTally {
    pub add: usize,
    pub change: usize,
    pub destroy: usize,
    pub moved: usize,
    pub drifted: usize,
}

impl PlanTally {
    fn record(&mut self, change_type: &ChangeType) {
        match change_type {
            ChangeType::Create => self.add += 1,
            ChangeType::Update => self.change += 1,
            ChangeType::Destroy => self.destroy += 1,
            ChangeType::Replace => {
                self.add += 1;
                self.destroy += 1;
            }
            _ => {}
        }
    }

    /// `Plan: X to add, Y to change, Z to destroy`, with moved and drifted
    /// counts appended when non-zero.
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "Plan: {} to add, {} to change, {} to destroy",
            self.add, self.change, self.destroy
        );
        if self.moved > 0 {
            let _ = write!(line, " ({} moved)", self.moved);
        }
        if self.drifted > 0 {
            let _ = write!(line, " ({} drifted)", self.drifted);
        }
        line
    }
}

/// Build the forest for a plan. Undecodable input yields a single error root.
pub fn build_forest(text: &str) -> Forest {
    match decode_plan(text) {
        Ok(document) => build_from_document(&document),
        Err(err) => {
            warn!("plan could not be decoded: {err}");
            Forest::from_drafts(vec![NodeDraft::new(
                NodeKind::Error,
                ChangeType::NoOp,
                format!("Error: {err}"),
            )])
        }
    }
}

/// Build the forest for an already decoded plan.
pub fn build_from_document(document: &PlanDocument) -> Forest {
    let (roots, tally) = plan_roots(document);
    debug!(
        roots = roots.len(),
        add = tally.add,
        change = tally.change,
        destroy = tally.destroy,
        moved = tally.moved,
        drifted = tally.drifted,
        "built plan forest"
    );
    Forest::from_drafts(roots)
}

fn plan_roots(document: &PlanDocument) -> (Vec<NodeDraft>, PlanTally) {
    let mut tally = PlanTally::default();
    let mut roots = Vec::new();

    let mut drifted: Vec<&ResourceChange> =
        document.resource_drift.iter().filter(|rc| !rc.is_no_op()).collect();
    drifted.sort_by(|a, b| a.address.cmp(&b.address));
    for rc in &drifted {
        roots.push(resource_root(rc, true));
        tally.drifted += 1;
    }
    if !drifted.is_empty() {
        roots.push(NodeDraft::new(NodeKind::Separator, ChangeType::NoOp, ""));
    }

    let mut planned: Vec<&ResourceChange> =
        document.resource_changes.iter().filter(|rc| !rc.is_no_op()).collect();
    planned.sort_by(|a, b| {
        (a.moved_from().is_some(), &a.address).cmp(&(b.moved_from().is_some(), &b.address))
    });
    for rc in &planned {
        let root = resource_root(rc, false);
        tally.record(&root.change_type);
        if rc.moved_from().is_some() {
            tally.moved += 1;
        }
        roots.push(root);
    }

    if document.errored {
        roots.push(NodeDraft::comment(ERRORED_NOTE));
    }
    if document.complete == Some(false) {
        roots.push(NodeDraft::comment(INCOMPLETE_NOTE));
    }

    let summary = if planned.is_empty() && drifted.is_empty() {
        NO_CHANGES.to_string()
    } else {
        tally.summary_line()
    };
    roots.push(NodeDraft::new(NodeKind::Summary, ChangeType::NoOp, summary));
    (roots, tally)
}

fn header_text(rc: &ResourceChange, change_type: &ChangeType, drifted: bool) -> String {
    let mut text = if drifted {
        format!("# {} has drifted ({})", rc.address, change_type.label())
    } else {
        format!("# {} will be {}", rc.address, change_type.past_participle())
    };
    if let Some(previous) = rc.moved_from() {
        let _ = write!(text, " (moved from {previous})");
    }
    if let Some(reason) = rc.action_reason.as_deref().filter(|r| !r.is_empty()) {
        let _ = write!(text, " ({})", action_reason_phrase(reason));
    }
    text
}

/// Header root, body block and its closing brace for one resource.
fn resource_root(rc: &ResourceChange, drifted: bool) -> NodeDraft {
    let classified = rc.change_type();
    let body = attributes::resource_body(&classified, &rc.change);

    // Representation-only updates keep their header but lose the body badge.
    let representation_only = body.changes == 0 && classified == ChangeType::Update;
    let badge = if representation_only { ChangeType::NoOp } else { classified.clone() };
    let mut lines = body.finish();
    if representation_only && rc.change.before != rc.change.after {
        lines.insert(0, NodeDraft::comment(NULL_ONLY_NOTE));
    }

    let keyword = if rc.is_data_source() { "data" } else { "resource" };
    let block_text = format!(
        "{} {keyword} \"{}\" \"{}\" {{",
        badge.prefix(),
        rc.resource_type,
        rc.name
    );
    let block = NodeDraft::block(badge, block_text, lines);

    let header_type = if drifted { ChangeType::Drift } else { classified.clone() };
    let mut header = NodeDraft::new(
        NodeKind::Resource,
        header_type,
        header_text(rc, &classified, drifted),
    )
    .with_children(vec![block, NodeDraft::closing("}")]);
    header.toggleable = false;
    header.expanded = true;
    header.previous_address = rc.moved_from().map(str::to_string);
    header.action_reason = rc.action_reason.clone().filter(|r| !r.is_empty());
    header.is_drifted = drifted;
    header
}
