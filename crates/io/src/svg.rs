// Flattened SVG export of a rendered chart

use std::fmt::Write as _;

use alignchart_engine::export::{ExportRequest, Exporter};
use alignchart_engine::grid::Axis;
use alignchart_engine::layout::{Area, Element, Layout, Track};

/// Writes the chart as a single self-contained SVG document.
///
/// Flexible tracks have no viewport to fill, so `fr` columns and `auto` rows
/// get fixed sizes. Interactive controls are not drawn.
#[derive(Debug, Clone)]
pub struct SvgExporter {
    pub fr_width: u32,
    pub auto_height: u32,
    pub font_size: u32,
}

impl Default for SvgExporter {
    fn default() -> Self {
        Self { fr_width: 160, auto_height: 160, font_size: 14 }
    }
}

/// Pixel offsets of every grid line along one axis.
fn track_lines(tracks: &[Track], flex: u32) -> Vec<u32> {
    let mut lines = Vec::with_capacity(tracks.len() + 1);
    let mut pos = 0;
    lines.push(pos);
    for track in tracks {
        pos += match *track {
            Track::Px(n) => n,
            Track::Fr(n) => n * flex,
            Track::Auto => flex,
        };
        lines.push(pos);
    }
    lines
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn is_cross_origin(reference: &str) -> bool {
    !reference.starts_with("data:")
}

struct Rect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl Rect {
    fn center(&self) -> (u32, u32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}

impl SvgExporter {
    fn rect(&self, area: &Area, rows: &[u32], cols: &[u32]) -> Rect {
        // Grid lines are 1-based; line n starts at offset index n - 1.
        let x = cols[area.col - 1];
        let y = rows[area.row - 1];
        Rect {
            x,
            y,
            w: cols[area.col - 1 + area.col_span] - x,
            h: rows[area.row - 1 + area.row_span] - y,
        }
    }

    fn render(&self, request: &ExportRequest) -> String {
        let layout: &Layout = &request.layout;
        let rows = track_lines(&layout.row_tracks, self.auto_height);
        let cols = track_lines(&layout.col_tracks, self.fr_width);
        let width = cols.last().copied().unwrap_or(0);
        let height = rows.last().copied().unwrap_or(0);

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="{fs}">"#,
            w = width,
            h = height,
            fs = self.font_size
        );
        let _ = writeln!(
            svg,
            r#"<rect width="{}" height="{}" fill="{}"/>"#,
            width,
            height,
            escape(&request.background)
        );

        for node in &layout.nodes {
            let r = self.rect(&node.area, &rows, &cols);
            let (cx, cy) = r.center();

            match &node.element {
                Element::Blank | Element::AddRow | Element::AddCol => {}
                Element::AxisTitle { axis, text } => {
                    let transform = match axis {
                        Axis::Top => String::new(),
                        Axis::Left => format!(r#" transform="rotate(-90 {} {})""#, cx, cy),
                    };
                    let _ = writeln!(
                        svg,
                        r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-weight="bold"{}>{}</text>"#,
                        cx,
                        cy,
                        transform,
                        escape(text)
                    );
                }
                Element::ColHeader { text, .. } | Element::RowHeader { text, .. } => {
                    let _ = writeln!(
                        svg,
                        r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
                        cx,
                        cy,
                        escape(text)
                    );
                }
                Element::Cell(cell) => {
                    let _ = writeln!(
                        svg,
                        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"#999999\"/>",
                        r.x, r.y, r.w, r.h
                    );
                    if let Some(image) = &cell.image {
                        if request.allow_cross_origin || !is_cross_origin(image) {
                            let _ = writeln!(
                                svg,
                                r#"<image href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid slice"/>"#,
                                escape(image),
                                r.x,
                                r.y,
                                r.w,
                                r.h
                            );
                        }
                    }
                    let _ = writeln!(
                        svg,
                        r#"<text x="{}" y="{}" text-anchor="middle">{}</text>"#,
                        cx,
                        r.y + r.h.saturating_sub(self.font_size / 2),
                        escape(&cell.caption)
                    );
                }
            }
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl Exporter for SvgExporter {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn export(&self, request: &ExportRequest) -> Result<Vec<u8>, String> {
        Ok(self.render(request).into_bytes())
    }
}
