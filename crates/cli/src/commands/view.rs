//! Interactive viewer subcommand.

use std::path::PathBuf;

use async_trait::async_trait;
use clap::Args;
use tfplan_core::build_forest;
use tfplan_tui::Theme;

use super::{Command, PlanInput};
use crate::config::{load_theme_config, read_plan};

/// Browse a plan interactively.
#[derive(Args, Debug)]
pub struct ViewArgs {
    #[command(flatten)]
    pub input: PlanInput,
    /// Config file with color settings. Defaults to `<config dir>/tfplan/config.yaml`.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[async_trait]
impl Command for ViewArgs {
    async fn execute(self) -> Result<(), Box<dyn std::error::Error>> {
        let theme = Theme::from_config(&load_theme_config(self.config.as_deref()).await?);
        let text = read_plan(self.input.file.as_deref()).await?;
        let forest = build_forest(&text);
        let title = self.input.title();

        // The event loop blocks on terminal input.
        tokio::task::spawn_blocking(move || tfplan_tui::run(forest, theme, &title)).await??;
        Ok(())
    }
}
