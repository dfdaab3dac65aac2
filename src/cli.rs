use std::env;
use std::io::{stderr, Write};

use log::{LevelFilter, Metadata, Record};

use crate::errors::Error;

#[derive(Debug)]
pub struct Config {
    pub level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: LevelFilter::Error,
        }
    }
}

/// `-v` selects informational logging, `-vv` debug. Anything else is
/// ignored.
pub fn parse_args() -> Config {
    let mut config = Config::default();

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-v" => config.level = LevelFilter::Info,
            "-vv" => config.level = LevelFilter::Debug,
            _ => {}
        }
    }

    config
}

/// Diagnostics go to stderr so they never mix with the JSON on stdout.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{} {}", record.level(), record.args());
        }
    }

    fn flush(&self) {
        stderr().flush().expect("Failed to flush stderr!")
    }
}

static LOGGER: StderrLogger = StderrLogger;

pub fn init_logger(level: LevelFilter) -> Result<(), Error> {
    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(level))
        .map_err(|_| Error::Logger("Failed to set logger."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_error() {
        assert_eq!(Config::default().level, LevelFilter::Error);
    }
}
