//! Column-aware slicing and wrapping of styled spans.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Drop the first `columns` display columns of a line.
pub fn skip_columns(spans: Vec<Span<'static>>, columns: usize) -> Vec<Span<'static>> {
    let mut remaining = columns;
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        if remaining == 0 {
            out.push(span);
            continue;
        }
        let mut cut = span.content.len();
        for (i, c) in span.content.char_indices() {
            if remaining == 0 {
                cut = i;
                break;
            }
            remaining = remaining.saturating_sub(char_width(c));
        }
        if cut < span.content.len() {
            out.push(Span::styled(span.content[cut..].to_string(), span.style));
        }
    }
    out
}

/// Break spans into lines at most `width` columns wide. Continuation lines
/// start with `indent` blank columns; every fragment keeps its span's style.
pub fn wrap_spans(spans: Vec<Span<'static>>, width: usize, indent: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![Line::from(spans)];
    }
    let indent = if indent * 2 > width { 0 } else { indent };
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0;
    let mut line_start = 0;

    for span in spans {
        let style = span.style;
        let mut piece = String::new();
        for c in span.content.chars() {
            let w = char_width(c);
            if used + w > width && used > line_start {
                if !piece.is_empty() {
                    current.push(Span::styled(std::mem::take(&mut piece), style));
                }
                lines.push(Line::from(std::mem::take(&mut current)));
                if indent > 0 {
                    current.push(Span::raw(" ".repeat(indent)));
                }
                used = indent;
                line_start = indent;
            }
            piece.push(c);
            used += w;
        }
        if !piece.is_empty() {
            current.push(Span::styled(piece, style));
        }
    }
    lines.push(Line::from(current));
    lines
}

/// Give every span a background and pad the line out to `width`.
pub fn fill_background(line: &mut Line<'static>, width: usize, background: Color) {
    for span in &mut line.spans {
        span.style = span.style.bg(background);
    }
    let used = line.width();
    if used < width {
        line.spans.push(Span::styled(
            " ".repeat(width - used),
            Style::default().bg(background),
        ));
    }
}
