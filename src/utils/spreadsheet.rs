//! Spreadsheet decoding for uploaded question sheets.
//!
//! Only the first worksheet is read. Cells come back as text with absolute
//! coordinates, so index 0 is always column A and row 0 is always the first
//! row of the sheet even when the used range starts further in.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::error::{Error, Result};

const XLSX_SIGNATURE: &[u8] = b"PK\x03\x04";
const XLS_SIGNATURE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Xlsx,
    Xls,
}

impl SpreadsheetFormat {
    pub fn from_extension(filename: &str) -> Option<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())?;

        match ext.as_str() {
            "xlsx" => Some(SpreadsheetFormat::Xlsx),
            "xls" => Some(SpreadsheetFormat::Xls),
            _ => None,
        }
    }

    pub fn matches_content(self, data: &[u8]) -> bool {
        match self {
            SpreadsheetFormat::Xlsx => data.starts_with(XLSX_SIGNATURE),
            SpreadsheetFormat::Xls => data.starts_with(XLS_SIGNATURE),
        }
    }
}

/// Text form of a single cell, the way a teacher typed it.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Materialises a worksheet range as rows of text anchored at A1.
pub fn range_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Vec<String>> = (0..start_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut cells = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(cell_text));
        rows.push(cells);
    }
    rows
}

/// Decodes an `.xlsx`/`.xls` upload and returns the rows of its first sheet.
pub fn read_first_sheet(data: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::BadRequest("The workbook does not contain any worksheet".into()))??;

    Ok(range_rows(&range))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(
            SpreadsheetFormat::from_extension("Questions.XLSX"),
            Some(SpreadsheetFormat::Xlsx)
        );
        assert_eq!(
            SpreadsheetFormat::from_extension("old.xls"),
            Some(SpreadsheetFormat::Xls)
        );
        assert_eq!(SpreadsheetFormat::from_extension("questions.csv"), None);
        assert_eq!(SpreadsheetFormat::from_extension("xlsx"), None);
    }

    #[test]
    fn signature_must_match_format() {
        assert!(SpreadsheetFormat::Xlsx.matches_content(b"PK\x03\x04rest"));
        assert!(!SpreadsheetFormat::Xlsx.matches_content(&[0xD0, 0xCF, 0x11, 0xE0]));
        assert!(SpreadsheetFormat::Xls.matches_content(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1]));
        assert!(!SpreadsheetFormat::Xls.matches_content(b"hello"));
    }

    #[test]
    fn cells_render_as_typed() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Float(1.0)), "1");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Int(42)), "42");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
        assert_eq!(cell_text(&Data::String(" yes ".into())), " yes ");
    }

    #[test]
    fn offset_ranges_are_padded_to_a1() {
        let mut range = Range::new((1, 1), (2, 2));
        range.set_value((1, 1), Data::String("Q".into()));
        range.set_value((2, 2), Data::String("A".into()));

        let rows = range_rows(&range);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_empty());
        assert_eq!(rows[1], vec!["".to_string(), "Q".to_string(), "".to_string()]);
        assert_eq!(rows[2], vec!["".to_string(), "".to_string(), "A".to_string()]);
    }

    #[test]
    fn legacy_xls_workbooks_are_decoded() {
        let data = include_bytes!("../../tests/fixtures/questions.xls");
        assert!(SpreadsheetFormat::Xls.matches_content(data));

        let rows = read_first_sheet(data).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0][0], "Question");
        assert_eq!(rows[1][..4], ["Capital of France?", "MCQ", "Paris", "TRUE"]);
        assert!(rows[2].iter().all(|c| c.is_empty()));
        assert_eq!(rows[3][2..], ["5", "1", "6", "0"]);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(read_first_sheet(b"definitely not a workbook").is_err());
    }
}
