//! Shared setup for integration tests: in-memory database plus workbook
//! builders for the ingestion scenarios.

use rust_xlsxwriter::Workbook;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use showroom::database::migrations::Migrator;

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// One workbook row in the 9-column layout:
/// [index, vehicle_name, row_type, model, trim, base_price, option_group, option_name, price]
pub struct Row<'a> {
    pub vehicle_name: Option<&'a str>,
    pub row_type: &'a str,
    pub model: &'a str,
    pub trim: &'a str,
    pub base_price: Option<f64>,
    pub option_group: Option<&'a str>,
    pub option_name: Option<&'a str>,
    pub price: Option<&'a str>,
}

impl<'a> Row<'a> {
    pub fn trim_row(vehicle_name: Option<&'a str>, model: &'a str, trim: &'a str, base_price: f64) -> Self {
        Self {
            vehicle_name,
            row_type: "TRIM",
            model,
            trim,
            base_price: Some(base_price),
            option_group: None,
            option_name: None,
            price: None,
        }
    }

    pub fn option_row(
        vehicle_name: Option<&'a str>,
        model: &'a str,
        trim: &'a str,
        group: &'a str,
        name: &'a str,
        price: &'a str,
    ) -> Self {
        Self {
            vehicle_name,
            row_type: "OPTION",
            model,
            trim,
            base_price: None,
            option_group: Some(group),
            option_name: Some(name),
            price: Some(price),
        }
    }
}

/// Build an xlsx workbook with one sheet per (brand, rows) pair.
pub fn build_workbook(sheets: &[(&str, Vec<Row<'_>>)]) -> Vec<u8> {
    let mut workbook = Workbook::new();

    for (brand, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*brand).expect("sheet name");

        for (i, row) in rows.iter().enumerate() {
            let r = i as u32;
            worksheet.write_number(r, 0, (i + 1) as f64).unwrap();
            if let Some(vehicle) = row.vehicle_name {
                worksheet.write_string(r, 1, vehicle).unwrap();
            }
            worksheet.write_string(r, 2, row.row_type).unwrap();
            worksheet.write_string(r, 3, row.model).unwrap();
            worksheet.write_string(r, 4, row.trim).unwrap();
            if let Some(base_price) = row.base_price {
                worksheet.write_number(r, 5, base_price).unwrap();
            }
            if let Some(group) = row.option_group {
                worksheet.write_string(r, 6, group).unwrap();
            }
            if let Some(name) = row.option_name {
                worksheet.write_string(r, 7, name).unwrap();
            }
            if let Some(price) = row.price {
                worksheet.write_string(r, 8, price).unwrap();
            }
        }
    }

    workbook.save_to_buffer().expect("workbook bytes")
}

/// The happy-path workbook: brand "현대", one vehicle line, one model,
/// two trims, one option with a thousands-separated price.
pub fn scenario_workbook() -> Vec<u8> {
    build_workbook(&[(
        "현대",
        vec![
            Row::trim_row(Some("2026 아반떼"), "2026 아반떼 가솔린", "스마트", 20_000_000.0),
            Row::trim_row(None, "2026 아반떼 가솔린", "모던", 22_000_000.0),
            Row::option_row(
                None,
                "2026 아반떼 가솔린",
                "스마트",
                "편의",
                "하이패스",
                "200,000",
            ),
        ],
    )])
}
