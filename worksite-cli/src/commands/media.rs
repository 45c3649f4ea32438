use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;
use worksite_core::media::content_type_for;
use worksite_lib::{MediaRef, ProjectStore};

use super::{confirm, Context};
use crate::error::CliError;

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn print_media(media: &MediaRef) {
    log::info!(
        "  {:<6} {:<6} {:<32} {:>10}  {}",
        media.id,
        media.media_kind().to_string(),
        media.name,
        media.size.map(format_size).unwrap_or_default(),
        media.url.if_supports_color(Stderr, |t| t.dimmed()),
    );
}

pub(crate) async fn run_media_list(ctx: &Context, id: i64) -> Result<(), CliError> {
    let store = ctx.open_store()?;
    let media = ctx.wait("Loading media...", store.list_media(id)).await?;
    if media.is_empty() {
        log::info!("No media for project {}.", id);
        return Ok(());
    }
    log::info!(
        "{}",
        format!("Media for project {} ({})", id, media.len())
            .if_supports_color(Stderr, |t| t.bold()),
    );
    for item in &media {
        print_media(item);
    }
    Ok(())
}

pub(crate) async fn run_media_upload(
    ctx: &Context,
    id: i64,
    files: Vec<PathBuf>,
) -> Result<(), CliError> {
    let store = ctx.open_store()?;
    let mut failed = 0usize;
    for path in &files {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            log::error!("Not a file: {}", path.display());
            failed += 1;
            continue;
        };
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Failed to read {}: {}", path.display(), e);
                failed += 1;
                continue;
            }
        };
        let content_type = content_type_for(name);
        let uploaded = ctx
            .wait(
                &format!("Uploading {}...", name),
                store.upload_media(id, name, content_type, bytes),
            )
            .await;
        match uploaded {
            Ok(media) => {
                log::info!(
                    "{} Uploaded {}",
                    "\u{2714}".if_supports_color(Stderr, |t| t.green()),
                    name.if_supports_color(Stderr, |t| t.bold()),
                );
                print_media(&media);
            }
            Err(e) => {
                log::error!(
                    "{} Upload of {} failed: {}",
                    "\u{2718}".if_supports_color(Stderr, |t| t.red()),
                    name,
                    e
                );
                failed += 1;
            }
        }
    }
    if failed > 0 {
        return Err(CliError::other(format!(
            "{} of {} upload(s) failed",
            failed,
            files.len()
        )));
    }
    Ok(())
}

pub(crate) async fn run_media_delete(ctx: &Context, id: i64, media: &str) -> Result<(), CliError> {
    let store = ctx.open_store()?;
    ctx.wait("Deleting media...", store.delete_media(id, media))
        .await?;
    log::info!(
        "{} Deleted media {} from project {}",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        media,
        id
    );
    Ok(())
}

pub(crate) async fn run_media_clear(ctx: &Context, id: i64, yes: bool) -> Result<(), CliError> {
    if !yes && !confirm(&format!("Delete all media of project {}?", id))? {
        log::info!("Cancelled.");
        return Ok(());
    }
    let store = ctx.open_store()?;
    ctx.wait("Deleting media...", store.delete_all_media(id))
        .await?;
    log::info!(
        "{} Removed all media from project {}",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::format_size;

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024 + 1024 * 512), "5.5 MB");
    }
}
