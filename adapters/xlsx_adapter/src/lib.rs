use chatstat_core::ports::{CountsWriter, Result, SpeakerWriter};
use chatstat_core::report::{DayCountRow, SpeakerRow};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Spreadsheet writer for per-day message counts.
///
/// Columns: date, total, anonymous, anonymous percentage. No header row.
pub struct XlsxCountsWriter {
    output_path: PathBuf,
}

impl XlsxCountsWriter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }
}

impl CountsWriter for XlsxCountsWriter {
    fn write_counts(&self, rows: &[DayCountRow]) -> Result<()> {
        save_rows(&self.output_path, rows, |sheet, row_index, row| {
            sheet.write_string(row_index, 0, &row.date)?;
            sheet.write_number(row_index, 1, row.total as f64)?;
            sheet.write_number(row_index, 2, row.anonymous as f64)?;
            sheet.write_number(row_index, 3, row.anonymous_percent)?;
            Ok(())
        })
    }
}

/// Spreadsheet writer for the speaker ranking.
///
/// Columns: display name, speak count. Rows keep the order they are given in.
pub struct XlsxSpeakerWriter {
    output_path: PathBuf,
}

impl XlsxSpeakerWriter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }
}

impl SpeakerWriter for XlsxSpeakerWriter {
    fn write_speakers(&self, rows: &[SpeakerRow]) -> Result<()> {
        save_rows(&self.output_path, rows, |sheet, row_index, row| {
            sheet.write_string(row_index, 0, &row.name)?;
            sheet.write_number(row_index, 1, row.count as f64)?;
            Ok(())
        })
    }
}

/// Writes one worksheet row per item and saves the workbook to `path`,
/// creating the parent directory if needed.
fn save_rows<T, F>(path: &Path, rows: &[T], mut write_row: F) -> Result<()>
where
    F: FnMut(&mut Worksheet, u32, &T) -> std::result::Result<(), rust_xlsxwriter::XlsxError>,
{
    // Make sure the output directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    // One row per item on the first worksheet, no header row
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (index, row) in rows.iter().enumerate() {
        let row_index = u32::try_from(index).map_err(|_| "too many rows for one worksheet")?;
        write_row(sheet, row_index, row)?;
    }
    workbook.save(path)?;

    info!(path = %path.display(), rows = rows.len(), "wrote spreadsheet");
    Ok(())
}
