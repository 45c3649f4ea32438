use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;
use worksite_lib::{MediaCache, MediaSource};

use super::Context;
use crate::error::CliError;

fn cache(ctx: &Context) -> MediaCache {
    MediaCache::new(ctx.settings.media_cache_dir())
}

/// Resolve a backend media URL, downloading into the cache on a miss.
pub(crate) async fn run_fetch(
    ctx: &Context,
    id: i64,
    url: &str,
    token: Option<&str>,
) -> Result<(), CliError> {
    let store = ctx.open_store()?;
    let remote = store.as_remote("The media cache")?;
    let source = ctx
        .wait(
            "Fetching media...",
            cache(ctx).resolve(remote.client(), Some(id), token, url),
        )
        .await?;
    match source {
        MediaSource::Cached(path) => log::info!(
            "{} {}",
            "Cached:".if_supports_color(Stderr, |t| t.green()),
            path.display()
        ),
        MediaSource::Remote(url) => {
            log::info!(
                "{} {}",
                "Remote:".if_supports_color(Stderr, |t| t.yellow()),
                url
            );
            log::info!("Pass --token to cache this file locally.");
        }
    }
    Ok(())
}

pub(crate) fn run_remove(ctx: &Context, id: i64, url: &str, token: &str) -> Result<(), CliError> {
    let store = ctx.open_store()?;
    let remote = store.as_remote("The media cache")?;
    if cache(ctx).remove(remote.client(), id, token, url)? {
        log::info!(
            "{} Removed cached copy of {}",
            "\u{2714}".if_supports_color(Stderr, |t| t.green()),
            url
        );
    } else {
        log::info!("No cached copy of {}", url);
    }
    Ok(())
}

pub(crate) fn run_clear(ctx: &Context) -> Result<(), CliError> {
    let cache = cache(ctx);
    let removed = cache.clear()?;
    log::info!(
        "{} Removed {} cached file{} from {}",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        removed,
        if removed == 1 { "" } else { "s" },
        cache.dir().display(),
    );
    Ok(())
}
