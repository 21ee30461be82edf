//! Title bar with the plan name and the most used shortcuts.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme::Theme;

const SHORTCUTS: &[(&str, &str)] = &[
    ("j/k", " Move  "),
    ("Enter", " Toggle  "),
    ("/", " Search  "),
    ("?", " Help  "),
    ("q", " Quit"),
];

/// Render the header bar.
pub fn render_header(f: &mut Frame<'_>, area: Rect, title: &str, theme: &Theme) {
    let shortcuts_len: usize = SHORTCUTS.iter().map(|(k, d)| k.len() + d.len()).sum();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(u16::try_from(shortcuts_len).unwrap_or(u16::MAX)),
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::styled(
            " tfplan ",
            Style::default()
                .fg(Color::Black)
                .bg(theme.info)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {title}"), theme.faint()),
    ]));

    let shortcuts: Vec<Span<'_>> = SHORTCUTS
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(*key, Style::default().fg(theme.warning)),
                Span::styled(*desc, theme.faint()),
            ]
        })
        .collect();
    let shortcuts_widget = Paragraph::new(Line::from(shortcuts)).alignment(Alignment::Right);

    f.render_widget(logo, chunks[0]);
    f.render_widget(shortcuts_widget, chunks[1]);
}
