// Storage, image acquisition and export backends

pub mod kv;
pub mod svg;
pub mod upload;

pub use kv::SqliteStore;
pub use svg::SvgExporter;
