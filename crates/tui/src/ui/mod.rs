//! UI rendering modules for the plan viewer.

mod header;
mod help;
pub mod plan;
mod status;
pub mod wrap;

pub use header::render_header;
pub use help::render_help;
pub use plan::{plan_view, render_plan, text_spans, PlanView};
pub use status::{render_status, status_line};

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::app::App;

/// Main UI function that renders all components.
pub fn ui(f: &mut Frame<'_>, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Plan
            Constraint::Length(1), // Status
        ])
        .split(f.area());

    render_header(f, chunks[0], &app.title, &app.theme);
    render_plan(f, chunks[1], app);
    render_status(f, chunks[2], app);

    if app.show_help {
        render_help(f, &app.theme);
    }
}
