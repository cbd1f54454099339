//! Per-cell auxiliary data: image reference and caption override.
//!
//! Entries are addressed by positional key `(row, col)`, not by a stable cell
//! identity. Deleting a row or column purges the entries at that index only;
//! entries at higher indices keep their old keys unless renumbering is
//! requested, in which case they shift down like spreadsheet cells do.

use crate::store::{caption_key, image_key, KvStore};

/// Read access to per-cell data, as needed by the layout renderer.
pub trait CellLookup {
    fn image(&self, row: usize, col: usize) -> Option<String>;
    fn caption(&self, row: usize, col: usize) -> Option<String>;
}

/// What happens to entries past a deleted row or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PurgePolicy {
    /// Only the deleted index is cleared; later entries keep their keys.
    #[default]
    ExactIndex,
    /// Later entries are moved down one index to follow their row/column.
    Renumber,
}

#[derive(Debug)]
pub struct CellStore<S> {
    kv: S,
}

impl<S: KvStore> CellStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn kv_mut(&mut self) -> &mut S {
        &mut self.kv
    }

    pub fn into_inner(self) -> S {
        self.kv
    }

    pub fn get_image(&self, row: usize, col: usize) -> Option<String> {
        self.kv.get(&image_key(row, col))
    }

    pub fn set_image(&mut self, row: usize, col: usize, reference: &str) -> Result<(), String> {
        self.kv.set(&image_key(row, col), reference)
    }

    pub fn clear_image(&mut self, row: usize, col: usize) -> Result<(), String> {
        self.kv.remove(&image_key(row, col))
    }

    pub fn get_caption(&self, row: usize, col: usize) -> Option<String> {
        self.kv.get(&caption_key(row, col))
    }

    pub fn set_caption(&mut self, row: usize, col: usize, text: &str) -> Result<(), String> {
        self.kv.set(&caption_key(row, col), text)
    }

    pub fn clear_caption(&mut self, row: usize, col: usize) -> Result<(), String> {
        self.kv.remove(&caption_key(row, col))
    }

    /// Commit edited caption text against the cell's current fallback.
    ///
    /// Empty text, or text equal to the fallback, removes the override so the
    /// cell keeps following its row and column labels. Returns true if an
    /// override is stored afterwards.
    pub fn commit_caption(
        &mut self,
        row: usize,
        col: usize,
        text: &str,
        fallback: &str,
    ) -> Result<bool, String> {
        let text = text.trim();
        if text.is_empty() || text == fallback {
            self.clear_caption(row, col)?;
            Ok(false)
        } else {
            self.set_caption(row, col, text)?;
            Ok(true)
        }
    }

    /// Drop the entries of deleted row `row` for columns `0..cols`.
    ///
    /// `rows` is the row count before the deletion; it bounds the shift when
    /// renumbering.
    pub fn purge_row(
        &mut self,
        row: usize,
        rows: usize,
        cols: usize,
        policy: PurgePolicy,
    ) -> Result<(), String> {
        for col in 0..cols {
            self.clear_cell(row, col)?;
        }
        if policy == PurgePolicy::Renumber {
            for r in row + 1..rows {
                for col in 0..cols {
                    self.move_cell((r, col), (r - 1, col))?;
                }
            }
        }
        Ok(())
    }

    /// Drop the entries of deleted column `col` for rows `0..rows`.
    pub fn purge_col(
        &mut self,
        col: usize,
        rows: usize,
        cols: usize,
        policy: PurgePolicy,
    ) -> Result<(), String> {
        for row in 0..rows {
            self.clear_cell(row, col)?;
        }
        if policy == PurgePolicy::Renumber {
            for c in col + 1..cols {
                for row in 0..rows {
                    self.move_cell((row, c), (row, c - 1))?;
                }
            }
        }
        Ok(())
    }

    fn clear_cell(&mut self, row: usize, col: usize) -> Result<(), String> {
        self.clear_image(row, col)?;
        self.clear_caption(row, col)
    }

    /// Move both entries from `from` to `to`, clearing whatever was at `to`.
    fn move_cell(&mut self, from: (usize, usize), to: (usize, usize)) -> Result<(), String> {
        let pairs = [
            (image_key(from.0, from.1), image_key(to.0, to.1)),
            (caption_key(from.0, from.1), caption_key(to.0, to.1)),
        ];
        for (src, dst) in pairs {
            match self.kv.get(&src) {
                Some(value) => {
                    self.kv.set(&dst, &value)?;
                    self.kv.remove(&src)?;
                }
                None => self.kv.remove(&dst)?,
            }
        }
        Ok(())
    }
}

impl<S: KvStore> CellLookup for CellStore<S> {
    fn image(&self, row: usize, col: usize) -> Option<String> {
        self.get_image(row, col)
    }

    fn caption(&self, row: usize, col: usize) -> Option<String> {
        self.get_caption(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn store_with_column_of_images(rows: usize) -> CellStore<MemoryStore> {
        let mut cells = CellStore::new(MemoryStore::new());
        for r in 0..rows {
            cells.set_image(r, 0, &format!("img{}", r)).unwrap();
            cells.set_caption(r, 0, &format!("cap{}", r)).unwrap();
        }
        cells
    }

    #[test]
    fn test_image_round_trip() {
        let mut cells = CellStore::new(MemoryStore::new());
        assert_eq!(cells.get_image(1, 2), None);

        cells.set_image(1, 2, "https://example.com/a.png").unwrap();
        assert_eq!(cells.get_image(1, 2).as_deref(), Some("https://example.com/a.png"));
        assert_eq!(cells.kv().get("cell_1_2").as_deref(), Some("https://example.com/a.png"));

        cells.clear_image(1, 2).unwrap();
        assert_eq!(cells.get_image(1, 2), None);
    }

    #[test]
    fn test_commit_caption_collapses_to_fallback() {
        let mut cells = CellStore::new(MemoryStore::new());

        assert!(cells.commit_caption(0, 0, "  Paladin ", "Lawful / Good").unwrap());
        assert_eq!(cells.get_caption(0, 0).as_deref(), Some("Paladin"));

        assert!(!cells.commit_caption(0, 0, "Lawful / Good", "Lawful / Good").unwrap());
        assert_eq!(cells.get_caption(0, 0), None);

        cells.set_caption(0, 0, "Paladin").unwrap();
        assert!(!cells.commit_caption(0, 0, "   ", "Lawful / Good").unwrap());
        assert!(cells.kv().is_empty());
    }

    #[test]
    fn test_purge_row_exact_index_leaves_later_keys() {
        let mut cells = store_with_column_of_images(4);

        cells.purge_row(1, 4, 3, PurgePolicy::ExactIndex).unwrap();

        assert_eq!(cells.get_image(0, 0).as_deref(), Some("img0"));
        assert_eq!(cells.get_image(1, 0), None);
        assert_eq!(cells.get_caption(1, 0), None);
        // Not migrated: still keyed at their old indices.
        assert_eq!(cells.get_image(2, 0).as_deref(), Some("img2"));
        assert_eq!(cells.get_image(3, 0).as_deref(), Some("img3"));
    }

    #[test]
    fn test_purge_row_renumber_shifts_up() {
        let mut cells = store_with_column_of_images(4);

        cells.purge_row(1, 4, 3, PurgePolicy::Renumber).unwrap();

        assert_eq!(cells.get_image(0, 0).as_deref(), Some("img0"));
        assert_eq!(cells.get_image(1, 0).as_deref(), Some("img2"));
        assert_eq!(cells.get_caption(2, 0).as_deref(), Some("cap3"));
        assert_eq!(cells.get_image(3, 0), None);
        assert_eq!(cells.get_caption(3, 0), None);
    }

    #[test]
    fn test_purge_col_renumber_clears_gaps() {
        let mut cells = CellStore::new(MemoryStore::new());
        cells.set_image(0, 1, "doomed").unwrap();
        cells.set_image(0, 2, "stale").unwrap();
        cells.set_caption(0, 3, "moves").unwrap();

        cells.purge_col(1, 3, 4, PurgePolicy::Renumber).unwrap();

        // Column 3 had no image, so nothing may linger at column 2 either.
        assert_eq!(cells.get_image(0, 1).as_deref(), Some("stale"));
        assert_eq!(cells.get_image(0, 2), None);
        assert_eq!(cells.get_caption(0, 2).as_deref(), Some("moves"));
        assert_eq!(cells.get_caption(0, 3), None);
    }

    #[test]
    fn test_purge_col_exact_index() {
        let mut cells = CellStore::new(MemoryStore::new());
        for r in 0..3 {
            cells.set_image(r, 0, "a").unwrap();
            cells.set_image(r, 1, "b").unwrap();
        }

        cells.purge_col(0, 3, 4, PurgePolicy::ExactIndex).unwrap();

        for r in 0..3 {
            assert_eq!(cells.get_image(r, 0), None);
            assert_eq!(cells.get_image(r, 1).as_deref(), Some("b"));
        }
    }
}
