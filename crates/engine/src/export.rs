//! Export contract: hand the rendered tree to a flattening collaborator.
//!
//! The chart does not rasterize anything itself. It prepares an
//! `ExportRequest` (the layout minus the add controls, the background fill,
//! the cross-origin policy and the file name) and passes it to an `Exporter`.

use crate::grid::{Axis, GridState};
use crate::layout::Layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Fill painted behind every node, e.g. `#ffffff`.
    pub background: String,
    /// Load cross-origin images permissively instead of skipping them.
    pub allow_cross_origin: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { background: "#ffffff".to_string(), allow_cross_origin: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub layout: Layout,
    /// File name without extension: `{axisTop}_{axisLeft}`.
    pub file_stem: String,
    pub background: String,
    pub allow_cross_origin: bool,
}

impl ExportRequest {
    pub fn new(grid: &GridState, layout: &Layout, options: &ExportOptions) -> Self {
        let mut layout = layout.clone();
        layout.nodes.retain(|n| !n.element.is_add_control());

        let file_stem = format!(
            "{}_{}",
            sanitize(grid.axis_label(Axis::Top)),
            sanitize(grid.axis_label(Axis::Left))
        );

        Self {
            layout,
            file_stem,
            background: options.background.clone(),
            allow_cross_origin: options.allow_cross_origin,
        }
    }

    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.file_stem, extension)
    }
}

/// Path separators would turn the download name into a directory path.
fn sanitize(label: &str) -> String {
    label.replace(['/', '\\'], "-")
}

/// Flattens a rendered chart into a single image file.
pub trait Exporter {
    /// File extension of the produced image, without the dot.
    fn extension(&self) -> &'static str;

    fn export(&self, request: &ExportRequest) -> Result<Vec<u8>, String>;
}
