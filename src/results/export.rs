use super::{MatchResult, RESULT_COLUMNS};
use crate::errors::ClientError;
use rust_xlsxwriter::{Format, Workbook};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const EXPORT_FILE_NAME: &str = "Resume_Match_Results.xlsx";
pub const EXPORT_SHEET_NAME: &str = "Resume Match Results";

/// Writes every result (not just the visible page) to `path` as a
/// single-sheet workbook.
pub fn export_to_spreadsheet(
    results: &[MatchResult],
    path: &Path,
) -> Result<PathBuf, ClientError> {
    let bytes = export_to_buffer(results)?;
    fs::write(path, bytes)?;
    info!("Exported {} results to {}", results.len(), path.display());
    Ok(path.to_path_buf())
}

/// Same as [`export_to_spreadsheet`] but returns the file bytes.
pub fn export_to_buffer(results: &[MatchResult]) -> Result<Vec<u8>, ClientError> {
    let mut workbook = build_workbook(results)?;
    Ok(workbook.save_to_buffer()?)
}

fn build_workbook(results: &[MatchResult]) -> Result<Workbook, ClientError> {
    if results.is_empty() {
        return Err(ClientError::NothingToExport);
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, title) in RESULT_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (i, result) in results.iter().enumerate() {
        let row = i as u32 + 1;
        if let Some(name) = &result.name {
            worksheet.write_string(row, 0, name)?;
        }
        worksheet.write_string(row, 1, &result.email)?;
        worksheet.write_number(row, 2, result.similarity_score)?;
        if let Some(category) = &result.category {
            worksheet.write_string(row, 3, category)?;
        }
        worksheet.write_string(row, 4, &result.resume_filename)?;
    }

    Ok(workbook)
}
