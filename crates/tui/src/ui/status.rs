//! Status line below the plan panel.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::navigator::{Mode, Navigator};
use crate::theme::Theme;

pub fn render_status(f: &mut Frame<'_>, area: Rect, app: &App) {
    f.render_widget(Paragraph::new(status_line(&app.navigator, &app.theme)), area);
}

/// `Line c of t (p%)`, then search state or the help hint, then scroll hints.
pub fn status_line(nav: &Navigator, theme: &Theme) -> Line<'static> {
    let total = nav.visible().len();
    let current = if total == 0 { 0 } else { nav.cursor() + 1 };
    let percent = if total == 0 { 100 } else { current * 100 / total };

    let mut spans = vec![Span::styled(
        format!("Line {current} of {total} ({percent}%)"),
        Style::default().add_modifier(Modifier::BOLD),
    )];

    let query = nav.search_query();
    let search = Style::default().fg(theme.highlight);
    match nav.mode() {
        Mode::SearchInput => {
            spans.push(Span::styled(format!(" - Search: {query}|"), search));
        }
        Mode::SearchActive if nav.search_matches().is_empty() => {
            spans.push(Span::styled(format!(" - Search: {query} (No matches)"), search));
        }
        Mode::SearchActive => {
            spans.push(Span::styled(
                format!(
                    " - Search: {query} ({}/{} matches)",
                    nav.search_index() + 1,
                    nav.search_matches().len()
                ),
                search,
            ));
        }
        Mode::Normal => spans.push(Span::styled(" - Press ? for help", theme.faint())),
    }

    if nav.window_top() > 0 {
        spans.push(Span::styled("  ↑ More content above", theme.faint()));
    }
    if nav.window_top() + nav.window_height() < total {
        spans.push(Span::styled("  ↓ More content below", theme.faint()));
    }
    Line::from(spans)
}
