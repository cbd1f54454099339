//! Chart controller.
//!
//! `Chart` owns the grid state and the cell store and is the only thing that
//! mutates them. Every applied command follows the same cycle: mutate, save
//! the snapshot, re-render the whole layout. Destructive commands ask a
//! `Confirm` implementation first; declining leaves everything untouched.

use log::{debug, info};

use crate::cells::{CellStore, PurgePolicy};
use crate::export::{ExportOptions, ExportRequest};
use crate::grid::{Axis, GridState};
use crate::layout::{self, EditTarget, Layout};
use crate::store::{KvStore, CELL_PREFIX};

pub const CONFIRM_DELETE_ROW: &str = "Are you sure you want to delete this row?";
pub const CONFIRM_DELETE_COL: &str = "Are you sure you want to delete this column?";
pub const CONFIRM_RESET: &str = "Are you sure you want to reset the entire chart?";

/// Yes/no dialog for irrevocable commands.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirms everything. For scripted use (`--yes`) and for tests.
pub struct AlwaysYes;

impl Confirm for AlwaysYes {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChartOptions {
    pub purge_policy: PurgePolicy,
}

/// A user interaction, as delivered by whatever surface drives the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text committed from an editable node (on loss of focus).
    Commit { target: EditTarget, text: String },
    AddRow,
    AddCol,
    DeleteRow(usize),
    DeleteCol(usize),
    SetImage { row: usize, col: usize, reference: String },
    ClearImage { row: usize, col: usize },
    Reset,
}

impl Command {
    fn confirmation(&self) -> Option<&'static str> {
        match self {
            Command::DeleteRow(_) => Some(CONFIRM_DELETE_ROW),
            Command::DeleteCol(_) => Some(CONFIRM_DELETE_COL),
            Command::Reset => Some(CONFIRM_RESET),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State changed, was saved, and the layout was rebuilt.
    Applied,
    /// The user declined the confirmation dialog.
    Declined,
    /// The command does not apply (index out of range, size floor reached).
    Rejected,
}

pub struct Chart<S> {
    grid: GridState,
    cells: CellStore<S>,
    options: ChartOptions,
    layout: Layout,
}

impl<S: KvStore> Chart<S> {
    /// Open a chart over `store`, picking up any saved state.
    ///
    /// Fails when the store cannot be read, so an unreadable chart is never
    /// replaced by defaults on the next save.
    pub fn open(store: S, options: ChartOptions) -> Result<Self, String> {
        let mut grid = GridState::new();
        let cells = CellStore::new(store);
        grid.load(cells.kv())?;
        let layout = layout::render(&grid, &cells);
        Ok(Self { grid, cells, options, layout })
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn cells(&self) -> &CellStore<S> {
        &self.cells
    }

    pub fn store(&self) -> &S {
        self.cells.kv()
    }

    pub fn into_store(self) -> S {
        self.cells.into_inner()
    }

    /// Layout produced by the last render.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Package the current layout for an exporter.
    pub fn export_request(&self, options: &ExportOptions) -> ExportRequest {
        ExportRequest::new(&self.grid, &self.layout, options)
    }

    /// Reload the saved snapshot and rebuild the layout from scratch.
    pub fn render(&mut self) -> Result<&Layout, String> {
        self.grid.load(self.cells.kv())?;
        self.layout = layout::render(&self.grid, &self.cells);
        Ok(&self.layout)
    }

    /// Apply one command through the mutate, save, render cycle.
    ///
    /// Errors only come from the backing store.
    pub fn apply(&mut self, command: Command, confirm: &mut dyn Confirm) -> Result<Outcome, String> {
        // Structural checks come before the dialog so a refused delete never prompts.
        if !self.is_applicable(&command) {
            debug!("Rejected {:?}", command);
            return Ok(Outcome::Rejected);
        }
        if let Some(prompt) = command.confirmation() {
            if !confirm.confirm(prompt) {
                debug!("Declined {:?}", command);
                return Ok(Outcome::Declined);
            }
        }

        debug!("Applying {:?}", command);
        match command {
            Command::Commit { target, text } => self.commit(target, &text)?,
            Command::AddRow => {
                self.grid.push_row();
            }
            Command::AddCol => {
                self.grid.push_col();
            }
            Command::DeleteRow(row) => self.delete_row(row)?,
            Command::DeleteCol(col) => self.delete_col(col)?,
            Command::SetImage { row, col, reference } => {
                self.cells.set_image(row, col, &reference)?;
            }
            Command::ClearImage { row, col } => self.cells.clear_image(row, col)?,
            Command::Reset => self.reset()?,
        }

        self.grid.save(self.cells.kv_mut())?;
        self.render()?;
        Ok(Outcome::Applied)
    }

    fn is_applicable(&self, command: &Command) -> bool {
        let rows = self.grid.row_count();
        let cols = self.grid.col_count();
        match command {
            Command::Commit { target, .. } => match *target {
                EditTarget::Axis { .. } => true,
                EditTarget::RowLabel { row } => row < rows,
                EditTarget::ColLabel { col } => col < cols,
                EditTarget::Caption { row, col } => row < rows && col < cols,
            },
            Command::AddRow | Command::AddCol | Command::Reset => true,
            Command::DeleteRow(row) => self.grid.can_remove_row() && *row < rows,
            Command::DeleteCol(col) => self.grid.can_remove_col() && *col < cols,
            Command::SetImage { row, col, .. } | Command::ClearImage { row, col } => {
                *row < rows && *col < cols
            }
        }
    }

    fn commit(&mut self, target: EditTarget, text: &str) -> Result<(), String> {
        match target {
            EditTarget::Axis { axis } => self.grid.rename_axis(axis, text),
            EditTarget::RowLabel { row } => {
                self.grid.rename_row(row, text);
            }
            EditTarget::ColLabel { col } => {
                self.grid.rename_col(col, text);
            }
            EditTarget::Caption { row, col } => {
                let fallback = self.grid.fallback_caption(row, col);
                self.cells.commit_caption(row, col, text, &fallback)?;
            }
        }
        Ok(())
    }

    fn delete_row(&mut self, row: usize) -> Result<(), String> {
        let (rows, cols) = (self.grid.row_count(), self.grid.col_count());
        self.cells.purge_row(row, rows, cols, self.options.purge_policy)?;
        self.grid.remove_row(row);
        Ok(())
    }

    fn delete_col(&mut self, col: usize) -> Result<(), String> {
        let (rows, cols) = (self.grid.row_count(), self.grid.col_count());
        self.cells.purge_col(col, rows, cols, self.options.purge_policy)?;
        self.grid.remove_col(col);
        Ok(())
    }

    fn reset(&mut self) -> Result<(), String> {
        let purged = self.cells.kv_mut().remove_prefixed(CELL_PREFIX)?;
        self.grid.reset();
        info!("Chart reset to defaults ({} cell entries removed)", purged);
        Ok(())
    }

    // =========================================================================
    // Convenience wrappers, one per user-facing operation
    // =========================================================================

    pub fn rename_row(&mut self, row: usize, text: &str) -> Result<Outcome, String> {
        self.apply(Command::Commit { target: EditTarget::RowLabel { row }, text: text.into() }, &mut AlwaysYes)
    }

    pub fn rename_col(&mut self, col: usize, text: &str) -> Result<Outcome, String> {
        self.apply(Command::Commit { target: EditTarget::ColLabel { col }, text: text.into() }, &mut AlwaysYes)
    }

    pub fn rename_axis(&mut self, axis: Axis, text: &str) -> Result<Outcome, String> {
        self.apply(Command::Commit { target: EditTarget::Axis { axis }, text: text.into() }, &mut AlwaysYes)
    }

    pub fn commit_caption(&mut self, row: usize, col: usize, text: &str) -> Result<Outcome, String> {
        self.apply(
            Command::Commit { target: EditTarget::Caption { row, col }, text: text.into() },
            &mut AlwaysYes,
        )
    }

    pub fn add_row(&mut self) -> Result<Outcome, String> {
        self.apply(Command::AddRow, &mut AlwaysYes)
    }

    pub fn add_col(&mut self) -> Result<Outcome, String> {
        self.apply(Command::AddCol, &mut AlwaysYes)
    }

    pub fn delete_row_confirmed(&mut self, row: usize, confirm: &mut dyn Confirm) -> Result<Outcome, String> {
        self.apply(Command::DeleteRow(row), confirm)
    }

    pub fn delete_col_confirmed(&mut self, col: usize, confirm: &mut dyn Confirm) -> Result<Outcome, String> {
        self.apply(Command::DeleteCol(col), confirm)
    }

    pub fn reset_confirmed(&mut self, confirm: &mut dyn Confirm) -> Result<Outcome, String> {
        self.apply(Command::Reset, confirm)
    }

    pub fn set_image(&mut self, row: usize, col: usize, reference: &str) -> Result<Outcome, String> {
        self.apply(Command::SetImage { row, col, reference: reference.into() }, &mut AlwaysYes)
    }

    pub fn clear_image(&mut self, row: usize, col: usize) -> Result<Outcome, String> {
        self.apply(Command::ClearImage { row, col }, &mut AlwaysYes)
    }
}
