//! Grid state: dimensions, labels and axis titles.
//!
//! Counts are derived from the label vectors, so `row_count() == row_labels().len()`
//! holds by construction. Structural changes go through `push_row`/`remove_row`
//! (and the column twins), which update label and count in one step.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::store::{KvStore, STATE_KEY};

/// Smallest number of rows or columns a chart may have.
pub const MIN_DIM: usize = 3;

pub const DEFAULT_ROW_LABELS: [&str; 3] = ["Good", "Neutral", "Evil"];
pub const DEFAULT_COL_LABELS: [&str; 3] = ["Lawful", "Neutral", "Chaotic"];
pub const DEFAULT_AXIS_TOP: &str = "X-Axis";
pub const DEFAULT_AXIS_LEFT: &str = "Y-Axis";

/// Which axis title an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Title above the column headers (the X axis).
    Top,
    /// Title left of the row headers (the Y axis).
    Left,
}

/// Default label for the row at 0-based `index`: `Y1`, `Y2`, ...
pub fn default_row_label(index: usize) -> String {
    format!("Y{}", index + 1)
}

/// Default label for the column at 0-based `index`: `X1`, `X2`, ...
pub fn default_col_label(index: usize) -> String {
    format!("X{}", index + 1)
}

/// Persisted form of the grid. Field names are part of the storage schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    rows: usize,
    cols: usize,
    row_labels: Vec<String>,
    col_labels: Vec<String>,
    axis_top_label: String,
    axis_left_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    row_labels: Vec<String>,
    col_labels: Vec<String>,
    axis_top: String,
    axis_left: String,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            row_labels: DEFAULT_ROW_LABELS.iter().map(|s| s.to_string()).collect(),
            col_labels: DEFAULT_COL_LABELS.iter().map(|s| s.to_string()).collect(),
            axis_top: DEFAULT_AXIS_TOP.to_string(),
            axis_left: DEFAULT_AXIS_LEFT.to_string(),
        }
    }
}

impl GridState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.row_labels.len()
    }

    pub fn col_count(&self) -> usize {
        self.col_labels.len()
    }

    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    pub fn axis_label(&self, axis: Axis) -> &str {
        match axis {
            Axis::Top => &self.axis_top,
            Axis::Left => &self.axis_left,
        }
    }

    /// Label shown in the row header: the stored label, or `Y{n}` when empty.
    pub fn row_display(&self, row: usize) -> String {
        match self.row_labels.get(row) {
            Some(label) if !label.is_empty() => label.clone(),
            _ => default_row_label(row),
        }
    }

    /// Label shown in the column header: the stored label, or `X{n}` when empty.
    pub fn col_display(&self, col: usize) -> String {
        match self.col_labels.get(col) {
            Some(label) if !label.is_empty() => label.clone(),
            _ => default_col_label(col),
        }
    }

    /// Caption a cell shows when it has no override, e.g. `Lawful / Good`.
    ///
    /// Always computed from the current labels, so renaming a row or column
    /// changes every fallback caption along it.
    pub fn fallback_caption(&self, row: usize, col: usize) -> String {
        format!("{} / {}", self.col_display(col), self.row_display(row))
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Store a trimmed row label. Returns false if `row` is out of range.
    pub fn rename_row(&mut self, row: usize, text: &str) -> bool {
        match self.row_labels.get_mut(row) {
            Some(label) => {
                *label = text.trim().to_string();
                true
            }
            None => false,
        }
    }

    /// Store a trimmed column label. Returns false if `col` is out of range.
    pub fn rename_col(&mut self, col: usize, text: &str) -> bool {
        match self.col_labels.get_mut(col) {
            Some(label) => {
                *label = text.trim().to_string();
                true
            }
            None => false,
        }
    }

    /// Store a trimmed axis title. Empty titles are kept as-is.
    pub fn rename_axis(&mut self, axis: Axis, text: &str) {
        let text = text.trim().to_string();
        match axis {
            Axis::Top => self.axis_top = text,
            Axis::Left => self.axis_left = text,
        }
    }

    /// Append a row labelled `Y{n}` where `n` is the new row count.
    pub fn push_row(&mut self) -> usize {
        let index = self.row_labels.len();
        self.row_labels.push(default_row_label(index));
        index
    }

    /// Append a column labelled `X{n}` where `n` is the new column count.
    pub fn push_col(&mut self) -> usize {
        let index = self.col_labels.len();
        self.col_labels.push(default_col_label(index));
        index
    }

    pub fn can_remove_row(&self) -> bool {
        self.row_count() > MIN_DIM
    }

    pub fn can_remove_col(&self) -> bool {
        self.col_count() > MIN_DIM
    }

    /// Remove the row at `row`, returning its label.
    ///
    /// Refuses (returns None) when the index is out of range or the chart is
    /// already at the minimum height.
    pub fn remove_row(&mut self, row: usize) -> Option<String> {
        if !self.can_remove_row() || row >= self.row_count() {
            return None;
        }
        Some(self.row_labels.remove(row))
    }

    /// Remove the column at `col`, returning its label.
    pub fn remove_col(&mut self, col: usize) -> Option<String> {
        if !self.can_remove_col() || col >= self.col_count() {
            return None;
        }
        Some(self.col_labels.remove(col))
    }

    /// Restore the compiled-in defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            rows: self.row_count(),
            cols: self.col_count(),
            row_labels: self.row_labels.clone(),
            col_labels: self.col_labels.clone(),
            axis_top_label: self.axis_top.clone(),
            axis_left_label: self.axis_left.clone(),
        }
    }

    /// The label vectors are authoritative; the stored counts are only checked.
    fn from_snapshot(snapshot: Snapshot) -> Result<Self, String> {
        let (rows, cols) = (snapshot.row_labels.len(), snapshot.col_labels.len());
        if rows < MIN_DIM || cols < MIN_DIM {
            return Err(format!(
                "grid is {}x{}, smaller than the {}x{} minimum",
                rows, cols, MIN_DIM, MIN_DIM
            ));
        }
        if snapshot.rows != rows || snapshot.cols != cols {
            warn!(
                "Saved chart state claims {}x{} but has {}x{} labels, using the labels",
                snapshot.rows, snapshot.cols, rows, cols
            );
        }

        Ok(Self {
            row_labels: snapshot.row_labels,
            col_labels: snapshot.col_labels,
            axis_top: snapshot.axis_top_label,
            axis_left: snapshot.axis_left_label,
        })
    }

    /// Write the snapshot as a single store entry.
    pub fn save(&self, store: &mut dyn KvStore) -> Result<(), String> {
        let json = serde_json::to_string(&self.to_snapshot()).map_err(|e| e.to_string())?;
        store.set(STATE_KEY, &json)
    }

    /// Replace this state with the persisted snapshot, if there is a usable one.
    ///
    /// A missing entry leaves the state alone. A malformed one is logged and
    /// also leaves the state alone. Returns whether the state was replaced.
    /// Only a store that cannot be read at all is an error, so a later save
    /// never overwrites a chart that merely failed to load.
    pub fn load(&mut self, store: &dyn KvStore) -> Result<bool, String> {
        let Some(json) = store.try_get(STATE_KEY)? else {
            return Ok(false);
        };

        let parsed = serde_json::from_str::<Snapshot>(&json)
            .map_err(|e| e.to_string())
            .and_then(Self::from_snapshot);

        match parsed {
            Ok(state) => {
                *self = state;
                Ok(true)
            }
            Err(e) => {
                warn!("Failed to load saved chart state: {}", e);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_defaults() {
        let grid = GridState::new();
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.col_count(), 3);
        assert_eq!(grid.row_labels(), ["Good", "Neutral", "Evil"]);
        assert_eq!(grid.col_labels(), ["Lawful", "Neutral", "Chaotic"]);
        assert_eq!(grid.axis_label(Axis::Top), "X-Axis");
        assert_eq!(grid.axis_label(Axis::Left), "Y-Axis");
    }

    #[test]
    fn test_fallback_caption_uses_current_labels() {
        let mut grid = GridState::new();
        assert_eq!(grid.fallback_caption(0, 0), "Lawful / Good");
        assert_eq!(grid.fallback_caption(2, 1), "Neutral / Evil");

        grid.rename_col(0, "Orderly");
        assert_eq!(grid.fallback_caption(0, 0), "Orderly / Good");

        grid.rename_col(0, "   ");
        grid.rename_row(1, "");
        assert_eq!(grid.fallback_caption(1, 0), "X1 / Y2");
    }

    #[test]
    fn test_rename_trims_and_rejects_out_of_range() {
        let mut grid = GridState::new();
        assert!(grid.rename_row(0, "  Saintly \n"));
        assert_eq!(grid.row_labels()[0], "Saintly");

        assert!(!grid.rename_row(3, "nope"));
        assert!(!grid.rename_col(7, "nope"));

        grid.rename_axis(Axis::Left, "  ");
        assert_eq!(grid.axis_label(Axis::Left), "");
    }

    #[test]
    fn test_push_uses_new_count_for_label() {
        let mut grid = GridState::new();
        assert_eq!(grid.push_col(), 3);
        assert_eq!(grid.col_labels()[3], "X4");
        assert_eq!(grid.push_row(), 3);
        assert_eq!(grid.push_row(), 4);
        assert_eq!(grid.row_labels()[3..], ["Y4", "Y5"]);
    }

    #[test]
    fn test_remove_respects_floor() {
        let mut grid = GridState::new();
        assert_eq!(grid.remove_row(0), None);
        assert_eq!(grid.remove_col(2), None);

        grid.push_row();
        assert_eq!(grid.remove_row(9), None);
        assert_eq!(grid.remove_row(1).as_deref(), Some("Neutral"));
        assert_eq!(grid.row_labels(), ["Good", "Evil", "Y4"]);
        assert_eq!(grid.remove_row(0), None);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut grid = GridState::new();
        grid.push_col();
        grid.push_row();
        grid.rename_row(2, "Wicked");
        grid.rename_axis(Axis::Top, "Order");

        let mut store = MemoryStore::new();
        grid.save(&mut store).unwrap();

        let mut fresh = GridState::new();
        assert!(fresh.load(&store).unwrap());
        assert_eq!(fresh, grid);
    }

    #[test]
    fn test_snapshot_schema() {
        let mut store = MemoryStore::new();
        GridState::new().save(&mut store).unwrap();

        let value: serde_json::Value = serde_json::from_str(&store.get(STATE_KEY).unwrap()).unwrap();
        assert_eq!(value["rows"], 3);
        assert_eq!(value["cols"], 3);
        assert_eq!(value["rowLabels"][2], "Evil");
        assert_eq!(value["colLabels"][0], "Lawful");
        assert_eq!(value["axisTopLabel"], "X-Axis");
        assert_eq!(value["axisLeftLabel"], "Y-Axis");
    }

    #[test]
    fn test_load_missing_keeps_state() {
        let mut grid = GridState::new();
        grid.push_row();
        let before = grid.clone();

        assert!(!grid.load(&MemoryStore::new()).unwrap());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_load_malformed_keeps_state() {
        let mut store = MemoryStore::new();
        let mut grid = GridState::new();
        grid.rename_axis(Axis::Top, "kept");
        let before = grid.clone();

        store.set(STATE_KEY, "{not json").unwrap();
        assert!(!grid.load(&store).unwrap());
        assert_eq!(grid, before);

        store.set(STATE_KEY, r#"{"rows":3}"#).unwrap();
        assert!(!grid.load(&store).unwrap());
        assert_eq!(grid, before);

        let too_small = r#"{"rows":2,"cols":3,"rowLabels":["a","b"],"colLabels":["a","b","c"],"axisTopLabel":"","axisLeftLabel":""}"#;
        store.set(STATE_KEY, too_small).unwrap();
        assert!(!grid.load(&store).unwrap());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_load_trusts_labels_over_counts() {
        let mut store = MemoryStore::new();
        let json = r#"{"rows":4,"cols":3,"rowLabels":["a","b","c"],"colLabels":["p","q","r","s"],"axisTopLabel":"T","axisLeftLabel":"L"}"#;
        store.set(STATE_KEY, json).unwrap();

        let mut grid = GridState::new();
        assert!(grid.load(&store).unwrap());
        assert_eq!(grid.row_labels(), ["a", "b", "c"]);
        assert_eq!(grid.col_labels(), ["p", "q", "r", "s"]);
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.col_count(), 4);
    }

    #[test]
    fn test_load_huge_count_does_not_grow() {
        let mut store = MemoryStore::new();
        let json = format!(
            r#"{{"rows":{},"cols":3,"rowLabels":["a","b","c"],"colLabels":["p","q","r"],"axisTopLabel":"T","axisLeftLabel":"L"}}"#,
            usize::MAX
        );
        store.set(STATE_KEY, &json).unwrap();

        let mut grid = GridState::new();
        assert!(grid.load(&store).unwrap());
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.row_labels(), ["a", "b", "c"]);
    }

    #[test]
    fn test_load_short_labels_with_big_count_is_malformed() {
        let mut store = MemoryStore::new();
        let json = r#"{"rows":5,"cols":3,"rowLabels":["a","b"],"colLabels":["p","q","r"],"axisTopLabel":"T","axisLeftLabel":"L"}"#;
        store.set(STATE_KEY, json).unwrap();

        let mut grid = GridState::new();
        let before = grid.clone();
        assert!(!grid.load(&store).unwrap());
        assert_eq!(grid, before);
    }
}
