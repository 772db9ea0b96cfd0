use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use reelgrab_lib::settings::{
    ENV_INDEX_URL, ENV_LIBRARY_DIR, ENV_OUTPUT_DIR, ENV_WORKERS, settings_path,
};
use reelgrab_lib::Settings;

use crate::error::CliError;

/// Show the effective settings and where they come from.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings_path();

    log::info!("{}", "reelgrab Settings".if_supports_color(Stdout, |t| t.bold()));
    log::info!("");

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    for var in [ENV_OUTPUT_DIR, ENV_LIBRARY_DIR, ENV_WORKERS, ENV_INDEX_URL] {
        if let Ok(value) = std::env::var(var) {
            log::info!(
                "  {} {}={}",
                "env".if_supports_color(Stdout, |t| t.yellow()),
                var,
                value,
            );
        }
    }
    log::info!("");

    let settings = Settings::load()?;
    for line in settings.to_toml_string()?.lines() {
        log::info!("  {}", line);
    }
    Ok(())
}

/// Write the default settings file unless one already exists.
pub(crate) fn run_config_init() -> Result<(), CliError> {
    let path = settings_path();
    if Settings::write_default_if_missing(&path)? {
        log::info!(
            "{} Wrote default settings to {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            path.display(),
        );
    } else {
        log::info!(
            "{} already exists; leaving it unchanged",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings_path().display());
}
