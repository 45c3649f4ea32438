use std::path::PathBuf;

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;
use worksite_lib::export::write_export;
use worksite_lib::{today, ExportFormat, ExportRange, ProjectStore};

use super::Context;
use crate::error::CliError;

/// Range from the flags; either bound falls back to the current month.
pub(crate) fn export_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    archived: bool,
    today: NaiveDate,
) -> Result<ExportRange, CliError> {
    let month = ExportRange::current_month(today);
    let range = ExportRange {
        start: start.unwrap_or(month.start),
        end: end.unwrap_or(month.end),
        include_archived: archived,
    };
    if range.end < range.start {
        return Err(CliError::input(format!(
            "Export end {} is before start {}",
            range.end, range.start
        )));
    }
    Ok(range)
}

pub(crate) async fn run_export(
    ctx: &Context,
    format: ExportFormat,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    archived: bool,
    out: Option<PathBuf>,
) -> Result<(), CliError> {
    let range = export_range(start, end, archived, today())?;
    let store = ctx.open_store()?;
    let file = ctx
        .wait(
            &format!("Exporting {} to {}...", range.start, range.end),
            store.export(format, &range),
        )
        .await?;
    let path = write_export(&file, out.as_deref())?;
    log::info!(
        "{} Saved {} ({} bytes)",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        path.display().if_supports_color(Stderr, |t| t.cyan()),
        file.bytes.len(),
    );
    Ok(())
}
