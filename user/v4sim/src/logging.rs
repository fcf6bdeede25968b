use std::env;

use log::{Level, LevelFilter, Log, Metadata, Record, set_logger, set_max_level};

pub struct Logger;

impl Log for Logger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let color = match record.level() {
            Level::Error => 31, // Red
            Level::Warn => 93,  // BrightYellow
            Level::Info => 37,  // White
            Level::Debug => 32, // Green
            Level::Trace => 90, // BrightBlack
        };
        eprintln!(
            "\u{1B}[{}m[{:>5}] {}\u{1B}[0m",
            color,
            record.level(),
            record.args(),
        );
    }

    fn flush(&self) {}
}

fn level_from_env() -> LevelFilter {
    env::var("V4SIM_LOG")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Debug)
}

pub fn init() {
    static LOGGER: Logger = Logger;
    if let Err(err) = set_logger(&LOGGER) {
        eprintln!("Error initializing logger: {:?}", err);
        return;
    }
    set_max_level(level_from_env());
}
