//! Event handling for keyboard and mouse input.

use std::io;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::app::App;
use crate::navigator::Mode;

/// Columns moved per horizontal wheel notch.
pub const WHEEL_SCROLL_STEP: usize = 20;

/// Handle a key press. Returns true if the application should quit.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');

    // The overlay closes on any key; the quit keys still quit.
    if app.show_help {
        app.show_help = false;
        return ctrl_c || key.code == KeyCode::Char('q');
    }

    let nav = &mut app.navigator;
    match nav.mode() {
        Mode::SearchInput => match key.code {
            _ if ctrl_c => nav.cancel_search(),
            KeyCode::Esc => nav.cancel_search(),
            KeyCode::Enter => nav.confirm_search(),
            KeyCode::Backspace => nav.pop_search_char(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                nav.push_search_char(c);
            }
            _ => {}
        },
        // Any key other than n/N leaves search without acting on it.
        Mode::SearchActive => match key.code {
            KeyCode::Char('n') => nav.next_match(),
            KeyCode::Char('N') => nav.prev_match(),
            _ => nav.cancel_search(),
        },
        Mode::Normal => {
            if ctrl_c {
                return true;
            }
            match key.code {
                KeyCode::Char('q') => return true,
                KeyCode::Up | KeyCode::Char('k') => nav.move_up(),
                KeyCode::Down | KeyCode::Char('j') => nav.move_down(),
                KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => nav.expand(),
                KeyCode::Enter => nav.toggle_children(),
                KeyCode::Left | KeyCode::Char('h') | KeyCode::Backspace => nav.collapse_or_parent(),
                KeyCode::Char('a') => nav.expand_all(),
                KeyCode::Char('A') => nav.collapse_all(),
                KeyCode::Char('n') => nav.next_root(),
                KeyCode::Char('N') => nav.prev_root(),
                KeyCode::Home | KeyCode::Char('g') => nav.go_top(),
                KeyCode::End | KeyCode::Char('G') => nav.go_bottom(),
                KeyCode::PageUp => nav.page_up(),
                KeyCode::PageDown => nav.page_down(),
                KeyCode::Char('/') => nav.start_search(),
                KeyCode::Char('?') => app.show_help = true,
                _ => {}
            }
        }
    }
    false
}

/// Handle mouse events.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => handle_mouse_click(app, mouse.column, mouse.row),
        MouseEventKind::ScrollUp => app.navigator.move_up(),
        MouseEventKind::ScrollDown => app.navigator.move_down(),
        MouseEventKind::ScrollLeft => app.navigator.scroll_left(WHEEL_SCROLL_STEP),
        MouseEventKind::ScrollRight => app.navigator.scroll_right(WHEEL_SCROLL_STEP),
        _ => {}
    }
}

/// Select the clicked row; clicking the selected row toggles it.
fn handle_mouse_click(app: &mut App, x: u16, y: u16) {
    if let Some(row) = app.row_at(x, y) {
        if row == app.navigator.cursor() {
            app.navigator.toggle();
        } else {
            app.navigator.select_index(row);
        }
    }
}

/// Run the main event loop. Returns when the user quits.
pub fn run_event_loop<B: ratatui::backend::Backend>(
    terminal: &mut ratatui::Terminal<B>,
    mut app: App,
    ui_fn: fn(&mut ratatui::Frame<'_>, &mut App),
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui_fn(f, &mut app))?;

        match event::read()? {
            Event::Key(key) => {
                if handle_key_event(&mut app, key) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => handle_mouse_event(&mut app, mouse),
            // The next draw measures the new panel size.
            Event::Resize(..) => {}
            _ => {}
        }
    }
}
