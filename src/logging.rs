//! Logger setup for binaries, benches and tests.

use std::io::Write;

use env_logger::{fmt::Formatter, Builder, Env, Target};
use log::{Level, LevelFilter, Record};

use crate::error::{Error, Result};

/// Install a compact stderr logger at `level`.
///
/// `RUST_LOG`, when set, overrides `level`. Fails if a logger is already installed.
pub fn init_logger(level: LevelFilter) -> Result<()> {
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .parse_env(Env::default())
        .write_style(env_logger::WriteStyle::Never)
        .target(Target::Stderr)
        .format(format_record);

    builder.try_init().map_err(|e| Error::Logger(e.to_string()))
}

fn format_record(buf: &mut Formatter, record: &Record) -> std::io::Result<()> {
    writeln!(
        buf,
        "{} {} [{}] {}",
        buf.timestamp_millis(),
        level_tag(record.level()),
        record.target(),
        record.args()
    )
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
