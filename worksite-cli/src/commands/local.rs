use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;
use worksite_lib::today;

use super::Context;
use crate::error::CliError;

/// Top the local store up to `count` demo projects.
pub(crate) fn run_seed(ctx: &Context, count: usize) -> Result<(), CliError> {
    let store = ctx.open_store()?;
    let created = store.seed(count, today())?;
    if created == 0 {
        log::info!("Store already holds {} or more projects; nothing seeded.", count);
    } else {
        log::info!(
            "{} Seeded {} demo project{}",
            "\u{2714}".if_supports_color(Stderr, |t| t.green()),
            created,
            if created == 1 { "" } else { "s" },
        );
    }
    Ok(())
}

pub(crate) fn run_stats(ctx: &Context) -> Result<(), CliError> {
    let store = ctx.open_store()?;
    let stats = store.as_local("Stats")?.stats()?;
    log::info!(
        "{}",
        "Local store".if_supports_color(Stderr, |t| t.bold())
    );
    log::info!(
        "  Database:  {}",
        ctx.settings
            .database_path()
            .display()
            .if_supports_color(Stderr, |t| t.cyan())
    );
    log::info!("  Projects:  {}", stats.projects);
    log::info!("  Active:    {}", stats.projects - stats.archived);
    log::info!("  Archived:  {}", stats.archived);
    log::info!("  Media:     {} ({} bytes)", stats.media, stats.media_bytes);
    Ok(())
}
