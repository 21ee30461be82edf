use async_trait::async_trait;
use clap::{Args, Subcommand};
use std::error::Error;
use std::path::PathBuf;

pub mod show;
pub mod view;

/// CLI subcommands for tfplan.
#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Browse a plan interactively.
    View(view::ViewArgs),
    /// Print the fully expanded plan tree.
    Show(show::ShowArgs),
}

/// Plan source shared by the subcommands.
#[derive(Args, Debug, Clone)]
pub struct PlanInput {
    /// Path to the JSON plan (`terraform show -json`). Reads stdin when omitted or `-`.
    pub file: Option<PathBuf>,
}

impl PlanInput {
    /// Name shown in the viewer's header.
    pub fn title(&self) -> String {
        match &self.file {
            Some(path) if path.as_os_str() != "-" => path.display().to_string(),
            _ => "stdin".to_string(),
        }
    }
}

/// Trait for executing CLI subcommands.
#[async_trait]
pub trait Command {
    /// Executes the subcommand.
    ///
    /// # Returns
    /// A `Result` indicating success or an error if execution fails.
    async fn execute(self) -> Result<(), Box<dyn Error>>;
}

#[async_trait]
impl Command for Cmd {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        match self {
            Cmd::View(args) => args.execute().await,
            Cmd::Show(args) => args.execute().await,
        }
    }
}
