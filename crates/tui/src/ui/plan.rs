//! Plan panel: styled lines for the rows inside the viewport.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tfplan_core::{ChangeType, NodeId, NodeKind, TreeNode};
use unicode_width::UnicodeWidthStr;

use super::wrap::{fill_background, skip_columns, wrap_spans};
use crate::app::App;
use crate::navigator::{Mode, Navigator};
use crate::theme::Theme;

/// Terminal lines for the viewport and the visible index each line belongs to.
#[derive(Debug, Default)]
pub struct PlanView {
    pub lines: Vec<Line<'static>>,
    pub rows: Vec<usize>,
}

/// Render the plan panel and remember its geometry for mouse hit testing.
pub fn render_plan(f: &mut Frame<'_>, area: Rect, app: &mut App) {
    app.plan_area = area;
    app.navigator
        .resize(usize::from(area.height), usize::from(area.width));
    let view = plan_view(&app.navigator, &app.theme, usize::from(area.height));
    app.row_map = view.rows;
    f.render_widget(Paragraph::new(view.lines), area);
}

/// Lay out the rows of the current window into at most `height` lines.
///
/// Wrapped rows can push the cursor row past the bottom; in that case
/// leading rows are dropped until the cursor row fits.
pub fn plan_view(nav: &Navigator, theme: &Theme, height: usize) -> PlanView {
    let mut groups: Vec<(usize, Vec<Line<'static>>)> = Vec::new();
    let mut used = 0;
    for (row, id) in nav.window() {
        let lines = node_lines(nav, theme, row, id);
        used += lines.len();
        groups.push((row, lines));
        // Rows above the cursor may wrap past the bottom; keep going until
        // the cursor row is collected so the trim below can make room.
        if used >= height && row >= nav.cursor() {
            break;
        }
    }

    if let Some(pos) = groups.iter().position(|(row, _)| *row == nav.cursor()) {
        let mut through_cursor: usize = groups[..=pos].iter().map(|(_, l)| l.len()).sum();
        let mut start = 0;
        while start < pos && through_cursor > height {
            through_cursor -= groups[start].1.len();
            start += 1;
        }
        groups.drain(..start);
    }

    let mut view = PlanView::default();
    for (row, lines) in groups {
        for line in lines {
            if view.lines.len() == height {
                return view;
            }
            view.lines.push(line);
            view.rows.push(row);
        }
    }
    view
}

fn node_lines(nav: &Navigator, theme: &Theme, row: usize, id: NodeId) -> Vec<Line<'static>> {
    let node = nav.forest().node(id);
    let is_cursor = row == nav.cursor();
    let marker_width = theme.cursor_char.width() + 1;

    let mut spans = Vec::new();
    if is_cursor {
        spans.push(Span::styled(
            format!("{} ", theme.cursor_char),
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::raw(" ".repeat(marker_width)));
    }
    spans.push(Span::raw("  ".repeat(node.depth)));
    spans.push(glyph(node, theme));

    let mut text = text_spans(node, theme);
    if nav.mode() == Mode::SearchActive && !nav.search_query().is_empty() {
        text = highlight_matches(text, nav.search_query(), theme.search_match());
    }
    spans.extend(text);

    if nav.horizontal_offset() > 0 {
        let mut shifted = vec![Span::styled("… ", theme.faint())];
        shifted.extend(skip_columns(spans, nav.horizontal_offset()));
        spans = shifted;
    }

    let text_column = marker_width + node.depth * 2 + 2;
    let mut lines = wrap_spans(spans, nav.width(), text_column);
    if is_cursor {
        for line in &mut lines {
            fill_background(line, nav.width(), theme.cursor_background);
        }
    }
    lines
}

fn glyph(node: &TreeNode, theme: &Theme) -> Span<'static> {
    if !node.can_toggle() {
        Span::raw("  ")
    } else if node.expanded {
        Span::styled("▼ ", Style::default().fg(theme.info))
    } else {
        Span::styled("▶ ", Style::default().fg(theme.highlight))
    }
}

/// Styled spans whose contents concatenate to exactly `node.text`.
pub fn text_spans(node: &TreeNode, theme: &Theme) -> Vec<Span<'static>> {
    let text = node.text.as_str();
    match node.kind {
        NodeKind::Resource => header_spans(node, theme),
        NodeKind::Comment if text.contains("unchanged") => {
            vec![Span::styled(text.to_string(), Style::default().fg(theme.info))]
        }
        NodeKind::Comment if text.starts_with("# Warning") => {
            vec![Span::styled(text.to_string(), Style::default().fg(theme.warning))]
        }
        NodeKind::Comment => vec![Span::styled(text.to_string(), theme.faint())],
        NodeKind::Summary => vec![Span::styled(
            text.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )],
        NodeKind::Error => vec![Span::styled(
            text.to_string(),
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD),
        )],
        NodeKind::Separator => Vec::new(),
        NodeKind::Block | NodeKind::Attribute | NodeKind::ClosingBrace => prefix_spans(text, theme),
    }
}

/// Resource headers: the whole line in the change color, except that a
/// drifted header only colors `has drifted` and a move phrase gets the
/// move accent.
fn header_spans(node: &TreeNode, theme: &Theme) -> Vec<Span<'static>> {
    let text = node.text.as_str();
    let color = if node.is_drifted {
        Style::default()
    } else {
        theme.change_style(&node.change_type)
    };
    let base = color.add_modifier(Modifier::BOLD);

    let mut accents = Vec::new();
    if node.is_drifted {
        if let Some(start) = text.find("has drifted") {
            accents.push((start, start + "has drifted".len(), theme.change_style(&ChangeType::Drift)));
        }
    }
    if let Some(previous) = &node.previous_address {
        let phrase = format!("(moved from {previous})");
        if let Some(start) = text.find(&phrase) {
            accents.push((start, start + phrase.len(), theme.change_style(&ChangeType::Move)));
        }
    }
    accents.sort_by_key(|(start, _, _)| *start);

    let mut spans = Vec::new();
    let mut at = 0;
    for (start, end, style) in accents {
        if start < at {
            continue;
        }
        if start > at {
            spans.push(Span::styled(text[at..start].to_string(), base));
        }
        spans.push(Span::styled(
            text[start..end].to_string(),
            style.add_modifier(Modifier::BOLD),
        ));
        at = end;
    }
    if at < text.len() {
        spans.push(Span::styled(text[at..].to_string(), base));
    }
    spans
}

/// Color only the diff marker at the start of a body line.
fn prefix_spans(text: &str, theme: &Theme) -> Vec<Span<'static>> {
    if let Some(rest) = text.strip_prefix("-/+") {
        return vec![
            Span::styled("-", theme.change_style(&ChangeType::Destroy)),
            Span::raw("/"),
            Span::styled("+", theme.change_style(&ChangeType::Create)),
            Span::raw(rest.to_string()),
        ];
    }
    if let Some(rest) = text.strip_prefix("<=") {
        return vec![
            Span::styled("<=", Style::default().fg(theme.info)),
            Span::raw(rest.to_string()),
        ];
    }
    let style = match text.chars().next() {
        Some('+') => theme.change_style(&ChangeType::Create),
        Some('-') => theme.change_style(&ChangeType::Destroy),
        Some('~') => theme.change_style(&ChangeType::Update),
        _ => return vec![Span::raw(text.to_string())],
    };
    vec![Span::styled(text[..1].to_string(), style), Span::raw(text[1..].to_string())]
}

/// Re-split spans so every occurrence of `query` carries `style` on top.
pub fn highlight_matches(spans: Vec<Span<'static>>, query: &str, style: Style) -> Vec<Span<'static>> {
    let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
    let ranges: Vec<(usize, usize)> = text
        .match_indices(query)
        .map(|(start, m)| (start, start + m.len()))
        .collect();
    if ranges.is_empty() {
        return spans;
    }

    let mut out = Vec::new();
    let mut offset = 0;
    for span in spans {
        let content = span.content.as_ref();
        let end = offset + content.len();
        let mut cuts = vec![offset, end];
        for &(s, e) in &ranges {
            cuts.extend([s, e].into_iter().filter(|&p| p > offset && p < end));
        }
        cuts.sort_unstable();
        cuts.dedup();
        for pair in cuts.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let inside = ranges.iter().any(|&(s, e)| a >= s && b <= e);
            let piece_style = if inside { span.style.patch(style) } else { span.style };
            out.push(Span::styled(content[a - offset..b - offset].to_string(), piece_style));
        }
        offset = end;
    }
    out
}
