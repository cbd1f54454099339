//! Plain-text rendering of a chart layout.
//!
//! Each grid track becomes a text column; spanning axis titles take the width
//! of the columns they cover. Images are shown as a `[img]` marker.

use unicode_width::UnicodeWidthStr;

use alignchart_engine::layout::{Control, Element, Layout};

/// Widest a single text column may get before truncation.
const MAX_COL_WIDTH: usize = 28;
const SEPARATOR: &str = " | ";

/// Display width of a string, accounting for CJK double-width, emoji, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `width` display columns, adding ".." if truncated.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        return s
            .chars()
            .take_while(|ch| unicode_width::UnicodeWidthChar::width(*ch).unwrap_or(0) <= width)
            .take(1)
            .collect();
    }

    let budget = width - 2;
    let mut used = 0;
    let mut end_byte = 0;
    for (i, ch) in s.char_indices() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            end_byte = i;
            break;
        }
        used += cw;
        end_byte = i + ch.len_utf8();
    }
    format!("{}..", &s[..end_byte])
}

/// Pad or truncate a string to exactly `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let s = truncate_display(s, width);
    let sw = display_width(&s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(sw)))
}

#[derive(Clone)]
enum Slot {
    Empty,
    Text { text: String, span: usize },
    /// Covered by a node starting further left.
    Covered,
}

fn element_text(element: &Element) -> String {
    match element {
        Element::Blank => String::new(),
        Element::AxisTitle { text, .. } => text.clone(),
        Element::ColHeader { text, controls, .. } | Element::RowHeader { text, controls, .. } => {
            if controls.iter().any(|c| matches!(c, Control::DeleteRow | Control::DeleteCol)) {
                format!("{} [x]", text)
            } else {
                text.clone()
            }
        }
        Element::AddCol | Element::AddRow => "[+]".to_string(),
        Element::Cell(cell) => match cell.image {
            Some(_) => format!("{} [img]", cell.caption),
            None => cell.caption.clone(),
        },
    }
}

pub fn render_text(layout: &Layout) -> String {
    let (rows, cols) = layout.dims();
    let mut slots = vec![vec![Slot::Empty; cols]; rows];

    for node in &layout.nodes {
        let (r, c) = (node.area.row - 1, node.area.col - 1);
        if r >= rows || c >= cols {
            continue;
        }
        let span = node.area.col_span.min(cols - c);
        slots[r][c] = Slot::Text { text: element_text(&node.element), span };
        for covered in slots[r].iter_mut().skip(c + 1).take(span - 1) {
            *covered = Slot::Covered;
        }
    }

    let mut widths = vec![1; cols];
    for row in &slots {
        for (c, slot) in row.iter().enumerate() {
            if let Slot::Text { text, span: 1 } = slot {
                widths[c] = widths[c].max(display_width(text).min(MAX_COL_WIDTH));
            }
        }
    }

    let mut out = String::new();
    for row in &slots {
        let mut parts = Vec::with_capacity(cols);
        let mut c = 0;
        while c < cols {
            match &row[c] {
                Slot::Text { text, span } => {
                    let span = (*span).max(1);
                    let width: usize = widths[c..c + span].iter().sum::<usize>()
                        + SEPARATOR.len() * (span - 1);
                    parts.push(pad_right(text, width));
                    c += span;
                }
                Slot::Empty | Slot::Covered => {
                    parts.push(" ".repeat(widths[c]));
                    c += 1;
                }
            }
        }
        out.push_str(parts.join(SEPARATOR).trim_end());
        out.push('\n');
    }
    out
}
