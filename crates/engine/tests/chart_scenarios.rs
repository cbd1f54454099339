// End-to-end chart behavior: resize, purge, reset and persistence across sessions.
// Run with: cargo test -p alignchart-engine --test chart_scenarios

use alignchart_engine::cells::PurgePolicy;
use alignchart_engine::chart::{AlwaysYes, Chart, ChartOptions, Outcome};
use alignchart_engine::grid::{Axis, GridState};
use alignchart_engine::store::{KvStore, MemoryStore, CELL_PREFIX};

fn fresh() -> Chart<MemoryStore> {
    Chart::open(MemoryStore::new(), ChartOptions::default()).unwrap()
}

fn renumbering() -> Chart<MemoryStore> {
    Chart::open(MemoryStore::new(), ChartOptions { purge_policy: PurgePolicy::Renumber }).unwrap()
}

// ---------------------------------------------------------------------------
// Add then delete a column
// ---------------------------------------------------------------------------

#[test]
fn add_col_then_delete_first_col() {
    let mut chart = fresh();

    assert_eq!(chart.add_col().unwrap(), Outcome::Applied);
    assert_eq!(chart.grid().col_count(), 4);
    assert_eq!(chart.grid().col_labels()[3], "X4");
    assert_eq!(chart.layout().data_cells().count(), 12);
    assert!(chart.layout().data_cells().any(|c| c.col == 3));

    assert_eq!(chart.delete_col_confirmed(0, &mut AlwaysYes).unwrap(), Outcome::Applied);
    assert_eq!(chart.grid().col_count(), 3);
    assert_eq!(chart.grid().col_labels(), ["Neutral", "Chaotic", "X4"]);
    assert_eq!(chart.layout().data_cells().count(), 9);
}

// ---------------------------------------------------------------------------
// Size floor
// ---------------------------------------------------------------------------

#[test]
fn deletes_never_go_below_three() {
    let mut chart = fresh();
    chart.add_row().unwrap();
    chart.add_row().unwrap();

    for _ in 0..5 {
        chart.delete_row_confirmed(0, &mut AlwaysYes).unwrap();
        assert!(chart.grid().row_count() >= 3);
    }
    assert_eq!(chart.grid().row_count(), 3);
    assert_eq!(chart.delete_row_confirmed(0, &mut AlwaysYes).unwrap(), Outcome::Rejected);
    assert_eq!(chart.delete_col_confirmed(1, &mut AlwaysYes).unwrap(), Outcome::Rejected);
}

// ---------------------------------------------------------------------------
// Positional keys after deletion
// ---------------------------------------------------------------------------

#[test]
fn delete_row_purges_exact_index_only() {
    let mut chart = fresh();
    chart.add_row().unwrap();
    chart.add_row().unwrap();
    for r in 0..5 {
        chart.set_image(r, 0, &format!("row{}.png", r)).unwrap();
    }
    chart.commit_caption(1, 2, "Doomed").unwrap();

    chart.delete_row_confirmed(1, &mut AlwaysYes).unwrap();

    let cells = chart.cells();
    assert_eq!(chart.grid().row_count(), 4);
    assert_eq!(cells.get_image(1, 0), None);
    assert_eq!(cells.get_caption(1, 2), None);
    // Entries past the deleted row are not migrated: they stay on their old keys,
    // so visual row 1 (old row 2) shows no image while old rows 2-4 keep theirs.
    assert_eq!(cells.get_image(2, 0).as_deref(), Some("row2.png"));
    assert_eq!(cells.get_image(3, 0).as_deref(), Some("row3.png"));
    assert_eq!(cells.get_image(4, 0).as_deref(), Some("row4.png"));

    let layout = chart.layout();
    assert_eq!(layout.cell(1, 0).unwrap().image, None);
    assert_eq!(layout.cell(2, 0).unwrap().image.as_deref(), Some("row2.png"));
    assert_eq!(layout.cell(3, 0).unwrap().image.as_deref(), Some("row3.png"));
    // Row 4 no longer exists, but its entry lingers in the store.
    assert!(layout.cell(4, 0).is_none());
    assert!(chart.store().get("cell_4_0").is_some());
}

#[test]
fn delete_row_with_renumbering_keeps_images_with_their_rows() {
    let mut chart = renumbering();
    chart.add_row().unwrap();
    for r in 0..4 {
        chart.set_image(r, 1, &format!("row{}.png", r)).unwrap();
    }

    chart.delete_row_confirmed(1, &mut AlwaysYes).unwrap();

    let layout = chart.layout();
    assert_eq!(layout.cell(0, 1).unwrap().image.as_deref(), Some("row0.png"));
    assert_eq!(layout.cell(1, 1).unwrap().image.as_deref(), Some("row2.png"));
    assert_eq!(layout.cell(2, 1).unwrap().image.as_deref(), Some("row3.png"));
    assert!(chart.store().get("cell_3_1").is_none());
}

#[test]
fn delete_col_with_renumbering_moves_captions() {
    let mut chart = renumbering();
    chart.add_col().unwrap();
    chart.commit_caption(0, 3, "Wildcard").unwrap();

    chart.delete_col_confirmed(0, &mut AlwaysYes).unwrap();

    let cell = chart.layout().cell(0, 2).unwrap();
    assert_eq!(cell.caption, "Wildcard");
    assert!(cell.overridden);
}

// ---------------------------------------------------------------------------
// Fallback captions
// ---------------------------------------------------------------------------

#[test]
fn renaming_a_column_changes_fallback_captions_without_cell_writes() {
    let mut chart = fresh();
    chart.commit_caption(1, 1, "True Neutral").unwrap();
    let keys_before = chart.store().keys();

    chart.rename_col(1, "Balanced").unwrap();

    assert_eq!(chart.store().keys(), keys_before);
    let layout = chart.layout();
    assert_eq!(layout.cell(0, 1).unwrap().caption, "Balanced / Good");
    assert_eq!(layout.cell(2, 1).unwrap().caption, "Balanced / Evil");
    assert_eq!(layout.cell(1, 1).unwrap().caption, "True Neutral");
}

#[test]
fn caption_matching_fallback_keeps_following_renames() {
    let mut chart = fresh();
    chart.commit_caption(2, 0, "  Lawful / Evil  ").unwrap();
    assert_eq!(chart.cells().get_caption(2, 0), None);

    chart.rename_row(2, "Villainous").unwrap();

    assert_eq!(chart.layout().cell(2, 0).unwrap().caption, "Lawful / Villainous");
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn state_survives_a_new_session() {
    let mut chart = fresh();
    chart.add_row().unwrap();
    chart.add_col().unwrap();
    chart.rename_row(0, "Heroic").unwrap();
    chart.rename_col(3, "").unwrap();
    chart.rename_axis(Axis::Top, "Ethics").unwrap();
    chart.rename_axis(Axis::Left, "Morals").unwrap();
    let expected = chart.grid().clone();

    let store = chart.into_store();
    let reopened = Chart::open(store, ChartOptions::default()).unwrap();

    assert_eq!(reopened.grid(), &expected);
    assert_eq!(reopened.grid().row_labels(), ["Heroic", "Neutral", "Evil", "Y4"]);
    assert_eq!(reopened.grid().col_labels()[3], "");
}

#[test]
fn corrupted_snapshot_is_ignored() {
    let mut store = MemoryStore::new();
    store.set("chart_state", "]]").unwrap();
    store.set("cell_0_0", "kept.png").unwrap();

    let mut chart = Chart::open(store, ChartOptions::default()).unwrap();

    assert_eq!(chart.grid(), &GridState::new());
    assert_eq!(chart.render().unwrap().cell(0, 0).unwrap().image.as_deref(), Some("kept.png"));
}

#[test]
fn oversized_snapshot_count_opens_at_label_size() {
    let mut store = MemoryStore::new();
    let json = format!(
        r#"{{"rows":{},"cols":3,"rowLabels":["a","b","c"],"colLabels":["p","q","r"],"axisTopLabel":"T","axisLeftLabel":"L"}}"#,
        u64::MAX
    );
    store.set("chart_state", &json).unwrap();

    let mut chart = Chart::open(store, ChartOptions::default()).unwrap();

    assert_eq!(chart.grid().row_count(), 3);
    assert_eq!(chart.render().unwrap().data_cells().count(), 9);
}

#[test]
fn render_twice_is_identical() {
    let mut chart = fresh();
    chart.add_col().unwrap();
    chart.set_image(0, 3, "https://example.com/x.png").unwrap();

    let first = chart.render().unwrap().clone();
    let second = chart.render().unwrap().clone();
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

#[test]
fn reset_restores_defaults_and_clears_cells() {
    let mut chart = fresh();
    chart.add_row().unwrap();
    chart.add_col().unwrap();
    chart.rename_axis(Axis::Left, "Something").unwrap();
    chart.set_image(3, 3, "a.png").unwrap();
    chart.commit_caption(0, 0, "Paladin").unwrap();
    chart.delete_row_confirmed(0, &mut AlwaysYes).unwrap();

    assert_eq!(chart.reset_confirmed(&mut AlwaysYes).unwrap(), Outcome::Applied);

    assert_eq!(chart.grid(), &GridState::new());
    assert!(!chart.store().keys().iter().any(|k| k.starts_with(CELL_PREFIX)));
    assert_eq!(chart.store().keys(), vec!["chart_state".to_string()]);
    assert!(chart.layout().data_cells().all(|c| c.image.is_none() && !c.overridden));
}
