use crate::entry::{Entry, HEADERS};
use crate::error::CodecError;
use rust_xlsxwriter::Workbook;

/// Name of the single worksheet in the data file
pub const SHEET_NAME: &str = "Data";

/// MIME type used when the workbook is shared or downloaded
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Convert entries to XLSX format
///
/// Builds a one-sheet workbook named `Data`. Row 0 holds `HEADERS`, then one
/// row per entry in slice order. Every cell is written as a string so phone
/// numbers and ids keep their exact text.
///
/// # Arguments
/// * `entries` - Rows to write, in order
///
/// # Returns
/// * `Result<Vec<u8>, CodecError>` - XLSX file content as bytes or an error
///
/// # Examples
/// ```
/// use contact_sheet::downloader::to_xlsx;
///
/// let bytes = to_xlsx(&[]).unwrap();
/// assert!(bytes.starts_with(b"PK"));
/// ```
pub fn to_xlsx(entries: &[Entry]) -> Result<Vec<u8>, CodecError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (c, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, c as u16, *header)?;
    }

    for (r, entry) in entries.iter().enumerate() {
        let row = (r + 1) as u32;
        for (c, value) in entry.to_row().iter().enumerate() {
            // Blank cells are left out, as the decoder treats missing and empty alike
            if !value.is_empty() {
                worksheet.write_string(row, c as u16, *value)?;
            }
        }
    }

    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}

/// Convert entries to CSV format
///
/// Same header and row order as the workbook. Values containing commas,
/// quotes or line breaks are quoted with inner quotes doubled.
///
/// # Examples
/// ```
/// use contact_sheet::downloader::to_csv;
///
/// let csv = to_csv(&[]);
/// assert_eq!(csv, "id,Name,Phone,Email,Details,City,Date,Time,Timestamp\n");
/// ```
pub fn to_csv(entries: &[Entry]) -> String {
    let mut csv_content = String::new();

    csv_content.push_str(&HEADERS.join(","));
    csv_content.push('\n');

    for entry in entries {
        for (c, value) in entry.to_row().iter().enumerate() {
            if c > 0 {
                csv_content.push(',');
            }
            csv_content.push_str(&escape_csv(value));
        }
        csv_content.push('\n');
    }

    csv_content
}

fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
