//! Layout derivation: grid state in, full visual tree out.
//!
//! `render` is a pure function. It is re-run from scratch after every
//! mutation; nothing here is patched incrementally. Positions are 1-based
//! grid lines, matching how the styling engine places items:
//!
//! ```text
//!          col 1       col 2        col 3 .. cols+2     col cols+3
//! row 1    corner      (axis title spanning data cols)  blank
//! row 2    blank       blank        column headers      add column
//! row 3..  (axis       row headers  data cells          blank
//!          title)
//! rows+3               add row      blanks              blank
//! ```

use serde::Serialize;

use crate::cells::CellLookup;
use crate::grid::{Axis, GridState};

/// One track of the grid template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Px(u32),
    Fr(u32),
    Auto,
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Track::Px(n) => write!(f, "{}px", n),
            Track::Fr(n) => write!(f, "{}fr", n),
            Track::Auto => write!(f, "auto"),
        }
    }
}

/// Placement of a node, in 1-based grid lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl Area {
    pub fn at(row: usize, col: usize) -> Self {
        Self { row, col, row_span: 1, col_span: 1 }
    }

    pub fn spanning(row: usize, col: usize, row_span: usize, col_span: usize) -> Self {
        Self { row, col, row_span, col_span }
    }
}

/// Where committed text from an editable node goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "target", rename_all = "camelCase")]
pub enum EditTarget {
    Axis { axis: Axis },
    RowLabel { row: usize },
    ColLabel { col: usize },
    Caption { row: usize, col: usize },
}

/// Clickable controls attached to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Control {
    UploadDevice,
    UploadUrl,
    ClearImage,
    DeleteRow,
    DeleteCol,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub row: usize,
    pub col: usize,
    /// Background fill: a data-URI or external URL.
    pub image: Option<String>,
    pub caption: String,
    /// True when `caption` comes from a stored override rather than the fallback.
    pub overridden: bool,
    pub controls: Vec<Control>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Element {
    Blank,
    AxisTitle { axis: Axis, text: String },
    ColHeader { col: usize, text: String, controls: Vec<Control> },
    RowHeader { row: usize, text: String, controls: Vec<Control> },
    AddCol,
    AddRow,
    Cell(CellView),
}

impl Element {
    /// Commit target if this element holds editable text.
    pub fn edit_target(&self) -> Option<EditTarget> {
        match self {
            Element::AxisTitle { axis, .. } => Some(EditTarget::Axis { axis: *axis }),
            Element::ColHeader { col, .. } => Some(EditTarget::ColLabel { col: *col }),
            Element::RowHeader { row, .. } => Some(EditTarget::RowLabel { row: *row }),
            Element::Cell(cell) => Some(EditTarget::Caption { row: cell.row, col: cell.col }),
            _ => None,
        }
    }

    /// Editable text shown by this element.
    pub fn text(&self) -> Option<&str> {
        match self {
            Element::AxisTitle { text, .. }
            | Element::ColHeader { text, .. }
            | Element::RowHeader { text, .. } => Some(text),
            Element::Cell(cell) => Some(&cell.caption),
            _ => None,
        }
    }

    pub fn is_add_control(&self) -> bool {
        matches!(self, Element::AddCol | Element::AddRow)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub area: Area,
    pub element: Element,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub row_tracks: Vec<Track>,
    pub col_tracks: Vec<Track>,
    pub nodes: Vec<Node>,
}

impl Layout {
    /// Number of grid lines-worth of tracks: `(rows + 3, cols + 3)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.row_tracks.len(), self.col_tracks.len())
    }

    pub fn data_cells(&self) -> impl Iterator<Item = &CellView> {
        self.nodes.iter().filter_map(|n| match &n.element {
            Element::Cell(cell) => Some(cell),
            _ => None,
        })
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellView> {
        self.data_cells().find(|c| c.row == row && c.col == col)
    }

    /// Node at an exact grid position (top-left of its area).
    pub fn node_at(&self, row: usize, col: usize) -> Option<&Node> {
        self.nodes.iter().find(|n| n.area.row == row && n.area.col == col)
    }

    pub fn find_editable(&self, target: EditTarget) -> Option<&Node> {
        self.nodes.iter().find(|n| n.element.edit_target() == Some(target))
    }
}

fn col_template(cols: usize) -> Vec<Track> {
    let mut tracks = vec![Track::Px(60), Track::Px(100)];
    tracks.extend(std::iter::repeat(Track::Fr(1)).take(cols));
    tracks.push(Track::Px(40));
    tracks
}

fn row_template(rows: usize) -> Vec<Track> {
    let mut tracks = vec![Track::Px(60), Track::Px(40)];
    tracks.extend(std::iter::repeat(Track::Auto).take(rows));
    tracks.push(Track::Px(40));
    tracks
}

/// Build the complete visual tree for `grid`, reading per-cell data from `cells`.
pub fn render<L: CellLookup + ?Sized>(grid: &GridState, cells: &L) -> Layout {
    let rows = grid.row_count();
    let cols = grid.col_count();
    let mut nodes = Vec::with_capacity((rows + 3) * (cols + 3));

    let mut place = |area: Area, element: Element| nodes.push(Node { area, element });

    // Header band
    place(Area::at(1, 1), Element::Blank);
    place(
        Area::spanning(1, 3, 1, cols),
        Element::AxisTitle { axis: Axis::Top, text: grid.axis_label(Axis::Top).to_string() },
    );
    place(Area::at(1, cols + 3), Element::Blank);
    place(Area::at(2, 1), Element::Blank);
    place(Area::at(2, 2), Element::Blank);

    let col_controls = if grid.can_remove_col() { vec![Control::DeleteCol] } else { Vec::new() };
    for c in 0..cols {
        place(
            Area::at(2, c + 3),
            Element::ColHeader { col: c, text: grid.col_display(c), controls: col_controls.clone() },
        );
    }
    place(Area::at(2, cols + 3), Element::AddCol);

    place(
        Area::spanning(3, 1, rows, 1),
        Element::AxisTitle { axis: Axis::Left, text: grid.axis_label(Axis::Left).to_string() },
    );

    // Data rows
    let row_controls = if grid.can_remove_row() { vec![Control::DeleteRow] } else { Vec::new() };
    for r in 0..rows {
        let line = r + 3;
        place(
            Area::at(line, 2),
            Element::RowHeader { row: r, text: grid.row_display(r), controls: row_controls.clone() },
        );

        for c in 0..cols {
            let image = cells.image(r, c);
            let (caption, overridden) = match cells.caption(r, c) {
                Some(text) => (text, true),
                None => (grid.fallback_caption(r, c), false),
            };
            let mut controls = vec![Control::UploadDevice, Control::UploadUrl];
            if image.is_some() {
                controls.push(Control::ClearImage);
            }
            place(
                Area::at(line, c + 3),
                Element::Cell(CellView { row: r, col: c, image, caption, overridden, controls }),
            );
        }

        place(Area::at(line, cols + 3), Element::Blank);
    }

    // Footer band
    place(Area::at(rows + 3, 2), Element::AddRow);
    for c in 0..cols {
        place(Area::at(rows + 3, c + 3), Element::Blank);
    }
    place(Area::at(rows + 3, cols + 3), Element::Blank);

    Layout { row_tracks: row_template(rows), col_tracks: col_template(cols), nodes }
}
