//! Print the fully expanded plan tree.

use std::io::IsTerminal;

use async_trait::async_trait;
use clap::Args;
use owo_colors::OwoColorize;
use tfplan_core::{build_forest, ChangeType, Forest, NodeKind, TreeNode};

use super::{Command, PlanInput};
use crate::config::read_plan;

/// Print the fully expanded plan tree.
#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub input: PlanInput,
    /// Never emit color codes, even on a terminal.
    #[arg(long)]
    pub no_color: bool,
}

#[async_trait]
impl Command for ShowArgs {
    async fn execute(self) -> Result<(), Box<dyn std::error::Error>> {
        let text = read_plan(self.input.file.as_deref()).await?;
        let mut forest = build_forest(&text);
        forest.expand_all();
        let color = !self.no_color && std::io::stdout().is_terminal();
        print!("{}", render_plain(&forest, color));
        Ok(())
    }
}

/// Every visible line, indented two spaces per level.
pub fn render_plain(forest: &Forest, color: bool) -> String {
    let mut out = String::new();
    for id in forest.visible() {
        let node = forest.node(id);
        out.push_str(&"  ".repeat(node.depth));
        if color {
            out.push_str(&paint(node));
        } else {
            out.push_str(&node.text);
        }
        out.push('\n');
    }
    out
}

fn paint(node: &TreeNode) -> String {
    let text = node.text.as_str();
    match node.kind {
        NodeKind::Resource => paint_header(node),
        NodeKind::Comment if text.contains("unchanged") => text.cyan().to_string(),
        NodeKind::Comment if text.starts_with("# Warning") => text.yellow().to_string(),
        NodeKind::Comment => text.dimmed().to_string(),
        NodeKind::Summary => text.bold().to_string(),
        NodeKind::Error => text.red().bold().to_string(),
        NodeKind::Separator => String::new(),
        NodeKind::Block | NodeKind::Attribute | NodeKind::ClosingBrace => paint_prefix(text),
    }
}

fn paint_change(text: &str, change_type: &ChangeType) -> String {
    match change_type {
        ChangeType::Create => text.green().to_string(),
        ChangeType::Destroy => text.red().to_string(),
        ChangeType::Update => text.yellow().to_string(),
        ChangeType::Replace => text.magenta().to_string(),
        ChangeType::Move => text.bright_cyan().to_string(),
        ChangeType::Drift => text.truecolor(255, 136, 0).to_string(),
        ChangeType::Other(_) => text.blue().to_string(),
        ChangeType::NoOp => text.to_string(),
    }
}

fn paint_header(node: &TreeNode) -> String {
    let text = node.text.as_str();
    let base = |part: &str| {
        if node.is_drifted {
            part.replacen("has drifted", &paint_change("has drifted", &ChangeType::Drift), 1)
        } else {
            paint_change(part, &node.change_type)
        }
    };
    let moved = node
        .previous_address
        .as_ref()
        .map(|previous| format!("(moved from {previous})"))
        .and_then(|phrase| text.find(&phrase).map(|at| (at, at + phrase.len())));
    match moved {
        Some((start, end)) => format!(
            "{}{}{}",
            base(&text[..start]),
            paint_change(&text[start..end], &ChangeType::Move),
            base(&text[end..])
        ),
        None => base(text),
    }
}

fn paint_prefix(text: &str) -> String {
    if let Some(rest) = text.strip_prefix("-/+") {
        return format!("{}/{}{rest}", "-".red(), "+".green());
    }
    if let Some(rest) = text.strip_prefix("<=") {
        return format!("{}{rest}", "<=".blue());
    }
    match text.chars().next() {
        Some('+') => format!("{}{}", "+".green(), &text[1..]),
        Some('-') => format!("{}{}", "-".red(), &text[1..]),
        Some('~') => format!("{}{}", "~".yellow(), &text[1..]),
        _ => text.to_string(),
    }
}
