//! Schedule exports rendered locally: an `.xlsx` workbook or a PDF table.

use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_xlsxwriter::{Format, Workbook};
use worksite_core::query::overlaps_range;
use worksite_core::util::format_date;
use worksite_core::{ExportFile, ExportFormat, ExportRange, Project};

use crate::error::WorksiteError;

/// Column headers, in order.
pub const COLUMNS: [&str; 9] = [
    "Code",
    "Name",
    "Client",
    "Address",
    "Sales",
    "Installer",
    "Start",
    "End",
    "Status",
];

/// Projects to include: those overlapping the range, archived ones only
/// when requested, ordered by start date.
pub fn export_rows(projects: Vec<Project>, range: &ExportRange) -> Vec<Project> {
    let mut rows: Vec<Project> = projects
        .into_iter()
        .filter(|p| overlaps_range(p, Some(range.start), Some(range.end)))
        .filter(|p| range.include_archived || !p.archived)
        .collect();
    rows.sort_by_key(|p| (p.start_date, p.id));
    rows
}

/// One row of cells matching [`COLUMNS`].
pub fn row_cells(project: &Project) -> [String; 9] {
    [
        project.project_code.clone(),
        project.name.clone(),
        project.client_name.clone(),
        project.address.clone(),
        project.sales_person.clone(),
        project.installer.clone(),
        format_date(project.start_date),
        format_date(project.end_date),
        project.status.label().to_string(),
    ]
}

/// Render `rows` in `format`, named `schedule_{start}_{end}.{ext}`.
pub fn render(
    format: ExportFormat,
    rows: &[Project],
    range: &ExportRange,
) -> Result<ExportFile, WorksiteError> {
    let bytes = match format {
        ExportFormat::Excel => render_xlsx(rows)?,
        ExportFormat::Pdf => render_pdf(rows, range)?,
    };
    Ok(ExportFile {
        file_name: range.file_name(format.extension()),
        content_type: format.content_type().to_string(),
        bytes,
    })
}

// ── Workbook ────────────────────────────────────────────────────────────────

const SHEET_NAME: &str = "Schedule";
/// Column widths in characters.
const SHEET_WIDTHS: [f64; 9] = [10.0, 28.0, 20.0, 32.0, 12.0, 14.0, 12.0, 12.0, 24.0];

/// Single sheet with a bold, frozen header row. Dates stay `YYYY-MM-DD` text.
pub fn render_xlsx(rows: &[Project]) -> Result<Vec<u8>, WorksiteError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, (title, width)) in COLUMNS.iter().zip(SHEET_WIDTHS).enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, &bold)?;
        sheet.set_column_width(col, width)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    for (row, project) in rows.iter().enumerate() {
        let row = row as u32 + 1;
        for (col, cell) in row_cells(project).iter().enumerate() {
            sheet.write_string(row, col as u16, cell)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

// ── PDF ─────────────────────────────────────────────────────────────────────

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 12.0;
const ROW_HEIGHT: f32 = 6.5;
const FONT_SIZE: f32 = 8.0;
/// Column widths in mm; they sum to the printable width.
const COLUMN_WIDTHS: [f32; 9] = [16.0, 44.0, 30.0, 58.0, 18.0, 22.0, 20.0, 20.0, 45.0];

/// A4 landscape table with a title line and a header repeated per page.
pub fn render_pdf(rows: &[Project], range: &ExportRange) -> Result<Vec<u8>, WorksiteError> {
    let title = format!("Installation schedule {} to {}", range.start, range.end);
    let (doc, page, layer) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| WorksiteError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| WorksiteError::Pdf(e.to_string()))?;

    let mut current = doc.get_page(page).get_layer(layer);
    current.use_text(pdf_text(&title), 12.0, Mm(MARGIN), Mm(PAGE_HEIGHT - MARGIN), &bold);
    let mut y = PAGE_HEIGHT - MARGIN - 10.0;
    draw_row(&current, &COLUMNS.map(str::to_string), y, &bold);
    y -= ROW_HEIGHT;

    for project in rows {
        if y < MARGIN {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            current = doc.get_page(page).get_layer(layer);
            y = PAGE_HEIGHT - MARGIN;
            draw_row(&current, &COLUMNS.map(str::to_string), y, &bold);
            y -= ROW_HEIGHT;
        }
        draw_row(&current, &row_cells(project), y, &font);
        y -= ROW_HEIGHT;
    }

    doc.save_to_bytes()
        .map_err(|e| WorksiteError::Pdf(e.to_string()))
}

fn draw_row(layer: &PdfLayerReference, cells: &[String; 9], y: f32, font: &IndirectFontRef) {
    let mut x = MARGIN;
    for (cell, width) in cells.iter().zip(COLUMN_WIDTHS) {
        // Helvetica at 8pt averages about 1.6 mm per character.
        let max_chars = (width / 1.6) as usize;
        layer.use_text(fit(&pdf_text(cell), max_chars), FONT_SIZE, Mm(x), Mm(y), font);
        x += width;
    }
}

/// Builtin PDF fonts cover Latin-1 only; other characters become `?`.
fn pdf_text(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) < 0x100 { c } else { '?' })
        .collect()
}

fn fit(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(2);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("..");
    out
}

// ── Writing ─────────────────────────────────────────────────────────────────

/// Write an export. `out` may be a directory (the file keeps its own name),
/// a file path, or `None` for the current directory.
pub fn write_export(file: &ExportFile, out: Option<&Path>) -> Result<PathBuf, WorksiteError> {
    let target = match out {
        Some(path) if path.is_dir() => path.join(&file.file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&file.file_name),
    };
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&target, &file.bytes)?;
    log::debug!("Wrote {} bytes to {}", file.bytes.len(), target.display());
    Ok(target)
}

#[cfg(test)]
#[path = "tests/export_tests.rs"]
mod tests;
