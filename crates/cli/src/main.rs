use clap::{ArgAction, Parser};
use tfplan_cli::commands::{Cmd, Command};

/// tfplan
///
/// Inspect the JSON export of an infrastructure plan as a collapsible,
/// change-annotated diff tree.
#[derive(Parser)]
#[command(name = "tfplan")]
#[command(about = "tfplan: interactive plan diff viewer")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Cmd,
}

/// Runs the tfplan CLI with the provided arguments.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .without_time()
        .init();

    cli.command.execute().await
}
