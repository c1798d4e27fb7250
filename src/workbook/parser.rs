use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde::{Deserialize, Serialize};

use crate::errors::ImportError;

/// Kind of a data row inside a brand sheet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowType {
    Trim,
    Option,
}

impl RowType {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TRIM" => Some(RowType::Trim),
            "OPTION" => Some(RowType::Option),
            _ => None,
        }
    }
}

/// One normalised row of a brand sheet, after carry-forward.
///
/// `vehicle_name` is always populated; rows seen before the first
/// non-empty vehicle name are dropped by the parser.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetRecord {
    pub vehicle_name: String,
    pub row_type: Option<RowType>,
    pub model: Option<String>,
    pub trim: Option<String>,
    pub base_price: i64,
    pub option_group: Option<String>,
    pub option_name: Option<String>,
    pub price: i64,
}

/// One brand sheet; the sheet name is the brand's display name.
#[derive(Clone, Debug)]
pub struct ParsedSheet {
    pub brand_name: String,
    pub records: Vec<SheetRecord>,
}

/// A parsed workbook, sheets in workbook order.
#[derive(Clone, Debug)]
pub struct ParsedWorkbook {
    pub sheets: Vec<ParsedSheet>,
}

impl ParsedWorkbook {
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.records.len()).sum()
    }
}

/// Raw per-row cell values before carry-forward is applied.
#[derive(Clone, Debug, Default)]
struct RawRecord {
    vehicle_name: Option<String>,
    row_type: Option<RowType>,
    model: Option<String>,
    trim: Option<String>,
    base_price: i64,
    option_group: Option<String>,
    option_name: Option<String>,
    price: i64,
}

/// Parse a workbook (`.xlsx` or `.xls`) from an in-memory buffer.
///
/// One sheet per brand. Sheets with at least 9 columns carry a leading
/// index column which is ignored; 8-column sheets start directly at the
/// vehicle name. Narrower sheets are padded with nulls on the right.
///
/// Malformed cells never fail the parse; they are coerced or replaced by
/// the documented sentinels. The only fatal error is a structurally
/// unreadable workbook.
pub fn parse_workbook(data: &[u8]) -> Result<ParsedWorkbook, ImportError> {
    let cursor = Cursor::new(data);
    let mut workbook = open_workbook_auto_from_rs(cursor).map_err(|e| {
        tracing::error!("failed to open workbook: {:?}", e);
        ImportError::ParseFailure(format!("{:?}", e))
    })?;

    let mut sheets = Vec::new();
    let sheet_names = workbook.sheet_names();
    tracing::debug!("workbook has {} sheets", sheet_names.len());

    for sheet_name in sheet_names {
        let sheet_name = sheet_name.to_string();
        let range = match workbook.worksheet_range(&sheet_name) {
            Ok(range) => range,
            Err(e) => {
                tracing::error!("failed to read sheet '{}': {:?}", sheet_name, e);
                return Err(ImportError::ParseFailure(format!(
                    "sheet '{}': {:?}",
                    sheet_name, e
                )));
            }
        };

        // Sheets with >= 9 columns carry a leading index column
        let offset = if range.width() >= 9 { 1 } else { 0 };

        let raw: Vec<RawRecord> = range.rows().map(|row| read_row(row, offset)).collect();
        let records = apply_carry_forward(raw);

        sheets.push(ParsedSheet {
            brand_name: sheet_name,
            records,
        });
    }

    Ok(ParsedWorkbook { sheets })
}

fn read_row(row: &[Data], offset: usize) -> RawRecord {
    let cell = |idx: usize| row.get(offset + idx);

    RawRecord {
        vehicle_name: cell_string(cell(0)),
        row_type: cell_string(cell(1)).and_then(|s| RowType::parse(&s)),
        model: cell_string(cell(2)),
        trim: cell_string(cell(3)),
        base_price: coerce_price(cell(4)),
        option_group: cell_string(cell(5)),
        option_name: cell_string(cell(6)),
        price: coerce_price(cell(7)),
    }
}

/// Substitute each empty `vehicle_name` with the last non-empty one seen
/// in the same sheet; drop rows seen before any vehicle name.
fn apply_carry_forward(raw: Vec<RawRecord>) -> Vec<SheetRecord> {
    let mut records = Vec::with_capacity(raw.len());
    let mut last_vehicle: Option<String> = None;

    for row in raw {
        let vehicle_name = match row.vehicle_name.or_else(|| last_vehicle.clone()) {
            Some(name) => name,
            None => continue,
        };
        last_vehicle = Some(vehicle_name.clone());

        records.push(SheetRecord {
            vehicle_name,
            row_type: row.row_type,
            model: row.model,
            trim: row.trim,
            base_price: row.base_price,
            option_group: row.option_group,
            option_name: row.option_name,
            price: row.price,
        });
    }

    records
}

/// Read a cell as trimmed text; empty and non-text/non-numeric cells are
/// the null value.
fn cell_string(cell: Option<&Data>) -> Option<String> {
    match cell? {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                Some(format!("{}", *f as i64))
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Lenient price coercion: integers pass through, floats truncate toward
/// zero, strings are cleaned up, anything else is zero.
fn coerce_price(cell: Option<&Data>) -> i64 {
    match cell {
        Some(Data::Int(i)) => *i,
        Some(Data::Float(f)) => *f as i64,
        Some(Data::String(s)) => parse_price_text(s),
        _ => 0,
    }
}

fn parse_price_text(text: &str) -> i64 {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    if cleaned.is_empty() {
        return 0;
    }
    let lowered = cleaned.to_ascii_lowercase();
    if lowered == "nan" || lowered == "none" {
        return 0;
    }

    if let Ok(value) = cleaned.parse::<i64>() {
        return value;
    }
    if let Ok(value) = cleaned.parse::<f64>() {
        return value as i64;
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(vehicle: Option<&str>, row_type: Option<RowType>) -> RawRecord {
        RawRecord {
            vehicle_name: vehicle.map(|s| s.to_string()),
            row_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_price_text_parsing() {
        assert_eq!(parse_price_text("200,000"), 200_000);
        assert_eq!(parse_price_text(" 1 234 "), 1234);
        assert_eq!(parse_price_text(""), 0);
        assert_eq!(parse_price_text("nan"), 0);
        assert_eq!(parse_price_text("None"), 0);
        assert_eq!(parse_price_text("19999.9"), 19999);
        assert_eq!(parse_price_text("-1,500"), -1500);
        assert_eq!(parse_price_text("abc"), 0);
    }

    #[test]
    fn test_coerce_price_truncates_floats_toward_zero() {
        assert_eq!(coerce_price(Some(&Data::Float(199.99))), 199);
        assert_eq!(coerce_price(Some(&Data::Float(-199.99))), -199);
        assert_eq!(coerce_price(Some(&Data::Int(20_000_000))), 20_000_000);
        assert_eq!(coerce_price(Some(&Data::Empty)), 0);
        assert_eq!(coerce_price(None), 0);
    }

    #[test]
    fn test_row_type_parse() {
        assert_eq!(RowType::parse("TRIM"), Some(RowType::Trim));
        assert_eq!(RowType::parse(" option "), Some(RowType::Option));
        assert_eq!(RowType::parse("구분"), None);
    }

    #[test]
    fn test_carry_forward_substitutes_last_seen_name() {
        let records = apply_carry_forward(vec![
            raw(Some("2026 아반떼"), Some(RowType::Trim)),
            raw(None, Some(RowType::Trim)),
            raw(None, Some(RowType::Option)),
            raw(Some("2026 쏘나타"), Some(RowType::Trim)),
            raw(None, Some(RowType::Option)),
        ]);

        let names: Vec<&str> = records.iter().map(|r| r.vehicle_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "2026 아반떼",
                "2026 아반떼",
                "2026 아반떼",
                "2026 쏘나타",
                "2026 쏘나타"
            ]
        );
    }

    #[test]
    fn test_rows_before_first_vehicle_name_are_dropped() {
        let records = apply_carry_forward(vec![
            raw(None, Some(RowType::Trim)),
            raw(None, Some(RowType::Option)),
            raw(Some("2026 아반떼"), Some(RowType::Trim)),
        ]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].vehicle_name, "2026 아반떼");
    }

    #[test]
    fn test_cell_string_normalises_numbers() {
        assert_eq!(cell_string(Some(&Data::Float(2026.0))), Some("2026".into()));
        assert_eq!(cell_string(Some(&Data::String("  ".into()))), None);
        assert_eq!(cell_string(Some(&Data::Empty)), None);
    }
}
