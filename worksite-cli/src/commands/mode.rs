use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;
use worksite_lib::settings::{save_mode, settings_path};
use worksite_lib::ApiMode;

use super::Context;
use crate::error::CliError;

pub(crate) fn run_mode_show(ctx: &Context) -> Result<(), CliError> {
    log::info!(
        "Mode: {}{}",
        ctx.mode.key().if_supports_color(Stderr, |t| t.bold()),
        if ctx.mode != ctx.settings.api.mode {
            format!(" (saved: {})", ctx.settings.api.mode)
        } else {
            String::new()
        },
    );
    match ctx.settings.base_url_for(ctx.mode) {
        Some(base) => log::info!("Backend: {}", base.if_supports_color(Stderr, |t| t.cyan())),
        None if ctx.mode.is_remote() => log::warn!("No backend URL configured for {}", ctx.mode),
        None => log::info!(
            "Database: {}",
            ctx.settings
                .database_path()
                .display()
                .if_supports_color(Stderr, |t| t.cyan())
        ),
    }
    log::info!("");
    log::info!(
        "Available: {}",
        ApiMode::all()
            .iter()
            .map(|m| m.key())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

pub(crate) fn run_mode_set(mode: ApiMode) -> Result<(), CliError> {
    let path = settings_path();
    save_mode(&path, mode)?;
    log::info!(
        "{} Mode set to {} in {}",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        mode.key().if_supports_color(Stderr, |t| t.bold()),
        path.display(),
    );
    if std::env::var(worksite_lib::settings::ENV_API_MODE).is_ok_and(|v| !v.trim().is_empty()) {
        log::warn!(
            "{} is set and overrides the saved mode",
            worksite_lib::settings::ENV_API_MODE
        );
    }
    Ok(())
}
