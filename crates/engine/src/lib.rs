pub mod cells;
pub mod chart;
pub mod dispatch;
pub mod export;
pub mod grid;
pub mod layout;
pub mod store;

pub use chart::{Chart, ChartOptions, Command, Confirm, Outcome};
pub use grid::{Axis, GridState};
pub use store::{KvStore, MemoryStore};
