//! Interactive terminal viewer for a built plan forest.

use std::io;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tfplan_core::Forest;

pub mod app;
pub mod event;
pub mod navigator;
pub mod theme;
pub mod ui;

pub use app::App;
pub use navigator::{Mode, Navigator};
pub use theme::{ColorConfig, Theme, ThemeConfig, UiConfig};

/// Take over the terminal and browse `forest` until the user quits.
///
/// The terminal is restored before returning, also when the event loop fails.
pub fn run(forest: Forest, theme: Theme, title: &str) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let app = App::new(forest, theme, title, size.width, size.height);
    let res = event::run_event_loop(&mut terminal, app, ui::ui);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}
