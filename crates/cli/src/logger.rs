//! Stderr logger for the `log` facade.
//!
//! Level comes from `ACHART_LOG` (`error`, `warn`, `info`, `debug`, `trace`)
//! when set, otherwise from the number of `-v` flags. Default is `warn`, so a
//! corrupted chart snapshot is reported without any flag.

use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn level_for(verbosity: u8, env: Option<&str>) -> LevelFilter {
    if let Some(level) = env.and_then(|v| v.parse().ok()) {
        return level;
    }
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Install the logger. Safe to call once; later calls are ignored.
pub fn init(verbosity: u8) {
    let env = std::env::var("ACHART_LOG").ok();
    let level = level_for(verbosity, env.as_deref());
    if log::set_boxed_logger(Box::new(StderrLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}
