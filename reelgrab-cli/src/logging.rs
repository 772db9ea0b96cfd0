//! Logger setup for `--quiet`, `--verbose` and `--logfile`.
//!
//! Normal output goes through `log::info!` and is printed as-is; warnings and
//! errors too. With `--verbose`, every line gets a timestamp and level. A
//! log file receives the same lines with ANSI color codes stripped.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use log::LevelFilter;

/// Writes to stdout and, optionally, a color-stripped copy to a file.
struct TeeWriter {
    file: Option<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(file) = &mut self.file {
            file.write_all(&strip_ansi_escapes::strip(buf))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = &mut self.file {
            file.flush()?;
        }
        Ok(())
    }
}

pub(crate) fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Per-module filters for the chosen flags. `rust_log` (the `RUST_LOG`
/// value) only applies when neither `--quiet` nor `--verbose` is given.
fn configure_filters(
    builder: &mut env_logger::Builder,
    quiet: bool,
    verbose: bool,
    rust_log: Option<&str>,
) {
    builder
        .filter_level(LevelFilter::Warn)
        .filter_module("reelgrab", level_for(quiet, verbose));
    if quiet || verbose {
        return;
    }
    if let Some(spec) = rust_log.filter(|s| !s.trim().is_empty()) {
        builder.parse_filters(spec);
    }
}

/// Install the global logger.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> io::Result<()> {
    let file = logfile.map(File::create).transpose()?;
    let rust_log = std::env::var(env_logger::DEFAULT_FILTER_ENV).ok();

    let mut builder = env_logger::Builder::new();
    configure_filters(&mut builder, quiet, verbose, rust_log.as_deref());
    builder
        .target(env_logger::Target::Pipe(Box::new(TeeWriter { file })))
        .format(move |buf, record| {
            if verbose {
                writeln!(
                    buf,
                    "{} {:<5} [{}] {}",
                    buf.timestamp_millis(),
                    record.level(),
                    record.target(),
                    record.args()
                )
            } else {
                writeln!(buf, "{}", record.args())
            }
        });

    if builder.try_init().is_err() {
        log::warn!("Logger is already initialized");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use log::{Level, Record};

    use super::*;

    fn enabled(
        quiet: bool,
        verbose: bool,
        rust_log: Option<&str>,
        level: Level,
        target: &str,
    ) -> bool {
        let mut builder = env_logger::Builder::new();
        configure_filters(&mut builder, quiet, verbose, rust_log);
        let logger = builder.build();
        logger.matches(&Record::builder().level(level).target(target).build())
    }

    #[test]
    fn quiet_wins_over_rust_log() {
        let target = "reelgrab_scraper::pipeline";
        assert!(!enabled(true, false, Some("debug"), Level::Info, target));
        assert!(enabled(true, false, Some("debug"), Level::Warn, target));
    }

    #[test]
    fn verbose_wins_over_rust_log() {
        assert!(enabled(false, true, Some("error"), Level::Debug, "reelgrab::commands"));
    }

    #[test]
    fn rust_log_applies_without_flags() {
        let target = "reelgrab_scraper::pipeline";
        assert!(enabled(false, false, Some("reelgrab=debug"), Level::Debug, target));
        assert!(!enabled(false, false, None, Level::Debug, target));
        assert!(enabled(false, false, None, Level::Info, target));
    }

    #[test]
    fn dependencies_stay_at_warn() {
        assert!(!enabled(false, false, None, Level::Info, "reqwest::connect"));
        assert!(enabled(false, false, None, Level::Warn, "reqwest::connect"));
    }
}
