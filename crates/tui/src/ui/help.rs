//! Key binding and color legend overlay.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};
use ratatui::Frame;
use tfplan_core::ChangeType;

use crate::theme::Theme;

const KEYS: &[(&str, &str)] = &[
    ("↑/k ↓/j", "move cursor"),
    ("→/l space", "expand"),
    ("←/h backspace", "collapse or go to parent"),
    ("enter", "expand subtree / collapse children"),
    ("a / A", "expand all / collapse all"),
    ("n / N", "next / previous resource"),
    ("g G", "top / bottom"),
    ("pgup pgdn", "page"),
    ("/", "search, then n / N between matches"),
    ("esc", "cancel search"),
    ("?", "toggle this help"),
    ("q ctrl+c", "quit"),
];

pub fn render_help(f: &mut Frame<'_>, theme: &Theme) {
    let area = centered_rect(f.area(), 60, 70);
    f.render_widget(Clear, area);

    let key_style = Style::default()
        .fg(theme.warning)
        .add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line<'_>> = KEYS
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{keys:<16}"), key_style),
                Span::raw(*what),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    for (marker, change_type, what) in [
        ("+", ChangeType::Create, "create"),
        ("-", ChangeType::Destroy, "destroy"),
        ("~", ChangeType::Update, "update in place"),
        ("-/+", ChangeType::Replace, "replace"),
        ("~", ChangeType::Move, "moved"),
        ("~", ChangeType::Drift, "drifted"),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("{marker:<4}"), theme.change_style(&change_type)),
            Span::raw(what),
        ]));
    }

    let block = Block::default()
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(theme.info)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .padding(Padding::horizontal(1));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(area);
    Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(vertical[1])[1]
}
