use crate::entry::{Entry, unique_id};
use crate::error::CodecError;
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;

/// Decode a workbook into entries
///
/// Reads the first worksheet. Its first row is the header; each later row is
/// mapped to an `Entry` by header name, so column order on disk does not
/// matter and unknown columns are dropped. Completely blank rows are skipped.
/// Rows whose `id` cell is empty get their zero-based position among the
/// decoded rows as id, or the next free integer above it when another row
/// already uses that value. Repeated ids are renumbered the same way, so
/// every decoded id is unique.
///
/// # Arguments
/// * `bytes` - Raw XLSX file content
///
/// # Returns
/// * `Result<Vec<Entry>, CodecError>` - Rows in file order or an error
///
/// # Examples
/// ```
/// use contact_sheet::downloader::to_xlsx;
/// use contact_sheet::loader::from_xlsx;
///
/// let bytes = to_xlsx(&[]).unwrap();
/// assert!(from_xlsx(&bytes).unwrap().is_empty());
/// ```
pub fn from_xlsx(bytes: &[u8]) -> Result<Vec<Entry>, CodecError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    // Get the first worksheet
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(CodecError::NoSheet)?;

    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_text).collect(),
        None => return Ok(Vec::new()),
    };

    let mut entries = Vec::new();
    for row in rows {
        if row.iter().all(|cell| cell_text(cell).is_empty()) {
            continue;
        }

        let mut entry = Entry::blank();
        for (header, cell) in headers.iter().zip(row.iter()) {
            entry.set_column(header, cell_text(cell));
        }

        entries.push(entry);
    }

    // Missing ids start from the row position; any id already used by an
    // earlier or later row is bumped to the next free one.
    for i in 0..entries.len() {
        let duplicate = entries[..i].iter().any(|e| e.id == entries[i].id);
        if entries[i].id.is_empty() || duplicate {
            let candidate = if entries[i].id.is_empty() {
                i.to_string()
            } else {
                entries[i].id.clone()
            };
            entries[i].id = unique_id(&candidate, &entries);
        }
    }

    Ok(entries)
}

/// Render a cell the way it reads in a spreadsheet UI
///
/// Integral floats lose their fraction so a phone number typed as a number
/// comes back as `9876543210`, not `9876543210.0`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::to_xlsx;
    use crate::entry::{EntryFields, HEADERS, Stamp};
    use rust_xlsxwriter::Workbook;

    fn entry(id: &str, name: &str) -> Entry {
        let fields = EntryFields {
            name: name.to_string(),
            phone: "9876543210".to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            details: String::new(),
            city: "Pune".to_string(),
        };
        Entry::with_id(id, &fields, Stamp::now())
    }

    #[test]
    fn decodes_what_the_writer_encodes() {
        for count in [0usize, 1, 4] {
            let entries: Vec<Entry> = (0..count)
                .map(|i| entry(&format!("17000000000{}", i), &format!("Name{}", i)))
                .collect();
            let bytes = to_xlsx(&entries).unwrap();
            assert_eq!(from_xlsx(&bytes).unwrap(), entries);
        }
    }

    #[test]
    fn maps_columns_by_header_and_fills_missing_ids() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Imported").unwrap();
        // reordered columns, no id column, a numeric phone and an extra column
        sheet.write_string(0, 0, "City").unwrap();
        sheet.write_string(0, 1, "Name").unwrap();
        sheet.write_string(0, 2, "Phone").unwrap();
        sheet.write_string(0, 3, "Notes").unwrap();
        sheet.write_string(1, 0, "Pune").unwrap();
        sheet.write_string(1, 1, "Alice").unwrap();
        sheet.write_number(1, 2, 9876543210.0).unwrap();
        sheet.write_string(1, 3, "ignored").unwrap();
        sheet.write_string(3, 1, "Bob").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let entries = from_xlsx(&bytes).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "0");
        assert_eq!(entries[0].city, "Pune");
        assert_eq!(entries[0].name, "Alice");
        assert_eq!(entries[0].phone, "9876543210");
        assert_eq!(entries[0].details, "");
        assert_eq!(entries[1].id, "1");
        assert_eq!(entries[1].name, "Bob");
    }

    #[test]
    fn fallback_ids_never_reuse_an_explicit_id() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Data").unwrap();
        sheet.write_string(0, 0, "id").unwrap();
        sheet.write_string(0, 1, "Name").unwrap();
        sheet.write_string(1, 0, "1").unwrap();
        sheet.write_string(1, 1, "Alice").unwrap();
        sheet.write_string(2, 1, "Bob").unwrap();
        sheet.write_string(3, 0, "1").unwrap();
        sheet.write_string(3, 1, "Cara").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let entries = from_xlsx(&bytes).unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(entries[1].name, "Bob");
    }

    #[test]
    fn header_only_sheet_is_empty() {
        let bytes = to_xlsx(&[]).unwrap();
        assert!(from_xlsx(&bytes).unwrap().is_empty());
        assert_eq!(HEADERS.len(), 9);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(from_xlsx(b"definitely not a zip archive").is_err());
    }
}
