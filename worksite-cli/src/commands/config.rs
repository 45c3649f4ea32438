use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;
use worksite_lib::settings::{
    settings_path, ENV_API_BASE, ENV_API_BASE_PROD, ENV_API_BASE_TEST, ENV_API_MODE, ENV_DB,
};

use super::Context;
use crate::error::CliError;

/// Show effective settings and which environment variables override them.
pub(crate) fn run_config_show(ctx: &Context) -> Result<(), CliError> {
    let path = settings_path();

    log::info!(
        "{}",
        "Worksite Configuration".if_supports_color(Stderr, |t| t.bold()),
    );
    log::info!("");
    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stderr, |t| t.cyan()),
            "(exists)".if_supports_color(Stderr, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stderr, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stderr, |t| t.dimmed()),
        );
    }

    let overrides: Vec<&str> = [ENV_API_MODE, ENV_API_BASE, ENV_API_BASE_PROD, ENV_API_BASE_TEST, ENV_DB]
        .into_iter()
        .filter(|var| std::env::var(var).is_ok_and(|v| !v.trim().is_empty()))
        .collect();
    if !overrides.is_empty() {
        log::info!(
            "  Environment:   {}",
            overrides.join(", ").if_supports_color(Stderr, |t| t.yellow())
        );
    }
    log::info!("");

    let effective =
        toml::to_string_pretty(&ctx.settings).map_err(|e| CliError::config(e.to_string()))?;
    for line in effective.lines() {
        log::info!("  {}", line);
    }
    log::info!("");
    log::info!(
        "  Database:      {}",
        ctx.settings.database_path().display()
    );
    log::info!(
        "  Media cache:   {}",
        ctx.settings.media_cache_dir().display()
    );
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    println!("{}", settings_path().display());
    Ok(())
}
