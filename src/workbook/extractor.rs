use serde::{Deserialize, Serialize};

use super::parser::{RowType, SheetRecord};

/// Brand prefixes stripped off vehicle names when deriving the vehicle
/// line ("현대 아반떼" and "아반떼" are the same line).
const BRAND_PREFIXES: &[&str] = &[
    "현대",
    "기아",
    "제네시스",
    "쉐보레",
    "르노코리아",
    "르노삼성",
    "KG모빌리티",
    "쌍용",
    "BMW",
    "벤츠",
    "아우디",
    "폭스바겐",
    "볼보",
    "테슬라",
];

/// The four-level hierarchy derived from one brand sheet.
#[derive(Clone, Debug, Default)]
pub struct BrandExtraction {
    pub vehicle_lines: Vec<VehicleLineRecord>,
    pub warnings: Vec<ExtractionWarning>,
}

#[derive(Clone, Debug)]
pub struct VehicleLineRecord {
    pub name: String,
    pub models: Vec<ModelRecord>,
}

#[derive(Clone, Debug)]
pub struct ModelRecord {
    pub name: String,
    pub release_year: Option<i32>,
    pub trims: Vec<TrimRecord>,
}

#[derive(Clone, Debug)]
pub struct TrimRecord {
    pub name: String,
    pub base_price: i64,
    pub options: Vec<OptionRecord>,
}

/// Options keep input order and are not deduplicated here, so repeated
/// rows stay observable to the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionRecord {
    pub name: String,
    pub group: Option<String>,
    pub price: i64,
}

/// Data-quality warnings collected while extracting; these never abort
/// an import, they end up in the job result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ExtractionWarning {
    UnknownTrimReference {
        model: String,
        trim: String,
        option: String,
    },
}

impl std::fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionWarning::UnknownTrimReference {
                model,
                trim,
                option,
            } => write!(
                f,
                "unknown trim reference: option '{}' targets ({}, {})",
                option, model, trim
            ),
        }
    }
}

/// Derive the vehicle-line/model/trim/option hierarchy from one brand
/// sheet's records.
///
/// Runs in two passes so the result does not depend on whether OPTION
/// rows appear before or after the TRIM rows they reference.
pub fn extract_brand(records: &[SheetRecord]) -> BrandExtraction {
    let mut extraction = BrandExtraction::default();

    // Pass 1: vehicle lines, models and trims. Models are drawn from TRIM
    // rows; an OPTION row naming an unknown model only ever produces a
    // warning in pass 2, never a model
    for record in records {
        let (line_name, year) = derive_vehicle_line_name(&record.vehicle_name);
        let line = line_entry(&mut extraction.vehicle_lines, &line_name);

        if record.row_type != Some(RowType::Trim) {
            continue;
        }
        let model_name = match &record.model {
            Some(name) => name,
            None => continue,
        };
        let model = model_entry(&mut line.models, model_name, year);

        if let Some(trim_name) = &record.trim {
            trim_entry(&mut model.trims, trim_name, record.base_price);
        }
    }

    // Pass 2: options, keyed to (model, trim) within the same line
    for record in records {
        if record.row_type != Some(RowType::Option) {
            continue;
        }
        let option_name = match &record.option_name {
            Some(name) => name.clone(),
            None => continue,
        };
        let (line_name, _) = derive_vehicle_line_name(&record.vehicle_name);

        let trim = record
            .model
            .as_deref()
            .zip(record.trim.as_deref())
            .and_then(|(model_name, trim_name)| {
                extraction
                    .vehicle_lines
                    .iter_mut()
                    .find(|l| l.name == line_name)?
                    .models
                    .iter_mut()
                    .find(|m| m.name == model_name)?
                    .trims
                    .iter_mut()
                    .find(|t| t.name == trim_name)
            });

        match trim {
            Some(trim) => trim.options.push(OptionRecord {
                name: option_name,
                group: record.option_group.clone(),
                price: record.price,
            }),
            None => extraction
                .warnings
                .push(ExtractionWarning::UnknownTrimReference {
                    model: record.model.clone().unwrap_or_default(),
                    trim: record.trim.clone().unwrap_or_default(),
                    option: option_name,
                }),
        }
    }

    extraction
}

/// Strip a leading four-digit year, then a known brand prefix, off a
/// vehicle name: "2026 현대 아반떼" -> ("아반떼", Some(2026)).
pub fn derive_vehicle_line_name(vehicle_name: &str) -> (String, Option<i32>) {
    let trimmed = vehicle_name.trim();
    let (rest, year) = strip_leading_year(trimmed);

    let mut name = rest.trim_start();
    for prefix in BRAND_PREFIXES {
        if let Some(stripped) = name.strip_prefix(prefix) {
            name = stripped.trim_start();
            break;
        }
    }

    if name.is_empty() {
        // Nothing left after stripping; keep the original so the line
        // is still addressable
        (trimmed.to_string(), year)
    } else {
        (name.to_string(), year)
    }
}

fn strip_leading_year(name: &str) -> (&str, Option<i32>) {
    let digits: String = name.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() != 4 {
        return (name, None);
    }

    let rest = &name[digits.len()..];
    let year = digits.parse::<i32>().ok().filter(|y| (1900..=2100).contains(y));
    (rest, year)
}

fn line_entry<'a>(
    lines: &'a mut Vec<VehicleLineRecord>,
    name: &str,
) -> &'a mut VehicleLineRecord {
    let idx = match lines.iter().position(|l| l.name == name) {
        Some(idx) => idx,
        None => {
            lines.push(VehicleLineRecord {
                name: name.to_string(),
                models: Vec::new(),
            });
            lines.len() - 1
        }
    };
    &mut lines[idx]
}

fn model_entry<'a>(
    models: &'a mut Vec<ModelRecord>,
    name: &str,
    year: Option<i32>,
) -> &'a mut ModelRecord {
    let idx = match models.iter().position(|m| m.name == name) {
        Some(idx) => idx,
        None => {
            models.push(ModelRecord {
                name: name.to_string(),
                release_year: year,
                trims: Vec::new(),
            });
            models.len() - 1
        }
    };
    &mut models[idx]
}

fn trim_entry<'a>(
    trims: &'a mut Vec<TrimRecord>,
    name: &str,
    base_price: i64,
) -> &'a mut TrimRecord {
    let idx = match trims.iter().position(|t| t.name == name) {
        Some(idx) => idx,
        None => {
            trims.push(TrimRecord {
                name: name.to_string(),
                base_price,
                options: Vec::new(),
            });
            trims.len() - 1
        }
    };
    &mut trims[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trim_row(vehicle: &str, model: &str, trim: &str, base_price: i64) -> SheetRecord {
        SheetRecord {
            vehicle_name: vehicle.to_string(),
            row_type: Some(RowType::Trim),
            model: Some(model.to_string()),
            trim: Some(trim.to_string()),
            base_price,
            option_group: None,
            option_name: None,
            price: 0,
        }
    }

    fn option_row(
        vehicle: &str,
        model: &str,
        trim: &str,
        group: &str,
        name: &str,
        price: i64,
    ) -> SheetRecord {
        SheetRecord {
            vehicle_name: vehicle.to_string(),
            row_type: Some(RowType::Option),
            model: Some(model.to_string()),
            trim: Some(trim.to_string()),
            base_price: 0,
            option_group: Some(group.to_string()),
            option_name: Some(name.to_string()),
            price,
        }
    }

    #[test]
    fn test_vehicle_line_name_derivation() {
        assert_eq!(
            derive_vehicle_line_name("2026 아반떼"),
            ("아반떼".to_string(), Some(2026))
        );
        assert_eq!(
            derive_vehicle_line_name("2026 현대 아반떼"),
            ("아반떼".to_string(), Some(2026))
        );
        assert_eq!(
            derive_vehicle_line_name("아반떼"),
            ("아반떼".to_string(), None)
        );
        // derivation is deterministic
        assert_eq!(
            derive_vehicle_line_name("2026 아반떼"),
            derive_vehicle_line_name("2026 아반떼")
        );
    }

    #[test]
    fn test_happy_path_hierarchy() {
        let records = vec![
            trim_row("2026 아반떼", "2026 아반떼 가솔린", "스마트", 20_000_000),
            trim_row("2026 아반떼", "2026 아반떼 가솔린", "모던", 22_000_000),
            option_row(
                "2026 아반떼",
                "2026 아반떼 가솔린",
                "스마트",
                "편의",
                "하이패스",
                200_000,
            ),
        ];

        let extraction = extract_brand(&records);
        assert!(extraction.warnings.is_empty());
        assert_eq!(extraction.vehicle_lines.len(), 1);

        let line = &extraction.vehicle_lines[0];
        assert_eq!(line.name, "아반떼");
        assert_eq!(line.models.len(), 1);

        let model = &line.models[0];
        assert_eq!(model.name, "2026 아반떼 가솔린");
        assert_eq!(model.release_year, Some(2026));
        assert_eq!(model.trims.len(), 2);
        assert_eq!(model.trims[0].name, "스마트");
        assert_eq!(model.trims[0].base_price, 20_000_000);

        assert_eq!(
            model.trims[0].options,
            vec![OptionRecord {
                name: "하이패스".to_string(),
                group: Some("편의".to_string()),
                price: 200_000,
            }]
        );
        assert!(model.trims[1].options.is_empty());
    }

    #[test]
    fn test_unknown_trim_reference_is_dropped_with_warning() {
        let records = vec![
            trim_row("2026 아반떼", "2026 아반떼 가솔린", "스마트", 20_000_000),
            option_row(
                "2026 아반떼",
                "2026 아반떼 가솔린",
                "스포츠",
                "편의",
                "하이패스",
                200_000,
            ),
        ];

        let extraction = extract_brand(&records);
        assert_eq!(extraction.warnings.len(), 1);
        assert_eq!(
            extraction.warnings[0],
            ExtractionWarning::UnknownTrimReference {
                model: "2026 아반떼 가솔린".to_string(),
                trim: "스포츠".to_string(),
                option: "하이패스".to_string(),
            }
        );
        assert!(extraction.vehicle_lines[0].models[0].trims[0]
            .options
            .is_empty());
    }

    #[test]
    fn test_options_keep_input_order_and_duplicates() {
        let records = vec![
            trim_row("2026 아반떼", "아반떼 가솔린", "스마트", 20_000_000),
            option_row("2026 아반떼", "아반떼 가솔린", "스마트", "편의", "하이패스", 1),
            option_row("2026 아반떼", "아반떼 가솔린", "스마트", "안전", "후방카메라", 2),
            option_row("2026 아반떼", "아반떼 가솔린", "스마트", "편의", "하이패스", 1),
        ];

        let extraction = extract_brand(&records);
        let options = &extraction.vehicle_lines[0].models[0].trims[0].options;
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].name, "하이패스");
        assert_eq!(options[1].name, "후방카메라");
        assert_eq!(options[2].name, "하이패스");
    }

    #[test]
    fn test_option_rows_may_precede_their_trim() {
        let records = vec![
            option_row("2026 아반떼", "아반떼 가솔린", "스마트", "편의", "하이패스", 1),
            trim_row("2026 아반떼", "아반떼 가솔린", "스마트", 20_000_000),
        ];

        let extraction = extract_brand(&records);
        assert!(extraction.warnings.is_empty());
        assert_eq!(
            extraction.vehicle_lines[0].models[0].trims[0].options.len(),
            1
        );
    }

    #[test]
    fn test_only_option_rows_yield_no_models() {
        let records = vec![option_row(
            "2026 아반떼",
            "아반떼 가솔린",
            "스마트",
            "편의",
            "하이패스",
            1,
        )];

        let extraction = extract_brand(&records);
        assert_eq!(extraction.warnings.len(), 1);
        // the vehicle line is still emitted, but no model without a TRIM row
        assert_eq!(extraction.vehicle_lines.len(), 1);
        assert!(extraction.vehicle_lines[0].models.is_empty());
    }
}
