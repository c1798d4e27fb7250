use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use crate::database::entities::{
    staging_brands, staging_models, staging_options, staging_trims, staging_vehicle_lines,
};
use crate::server::app::AppState;
use crate::services::{
    BrandFields, ModelFields, OptionFields, StagingService, TrimFields, VehicleLineFields,
};

use super::catalog_status;

#[derive(Deserialize)]
pub struct BrandRequest {
    pub name: String,
    pub country: Option<String>,
    pub logo_url: Option<String>,
    pub manager: Option<String>,
}

#[derive(Deserialize)]
pub struct VehicleLineRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct ModelRequest {
    pub name: String,
    pub code: String,
    pub release_year: Option<i32>,
    pub price: Option<i64>,
    #[serde(default)]
    pub is_foreign: bool,
}

#[derive(Deserialize)]
pub struct TrimRequest {
    pub name: String,
    pub car_type: Option<String>,
    pub fuel_name: Option<String>,
    pub cc: Option<i32>,
    #[serde(default)]
    pub base_price: i64,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct OptionRequest {
    pub name: String,
    pub code: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub price: i64,
    pub discounted_price: Option<i64>,
}

// ---- creation ----------------------------------------------------------

pub async fn create_brand(
    State(state): State<AppState>,
    Path(version_id): Path<i32>,
    Json(payload): Json<BrandRequest>,
) -> Result<Json<staging_brands::Model>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let brand = service
        .insert_brand(
            version_id,
            BrandFields {
                name: payload.name,
                country: payload.country,
                logo_url: payload.logo_url,
                manager: payload.manager,
            },
        )
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(brand))
}

pub async fn create_vehicle_line(
    State(state): State<AppState>,
    Path((version_id, brand_id)): Path<(i32, i32)>,
    Json(payload): Json<VehicleLineRequest>,
) -> Result<Json<staging_vehicle_lines::Model>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let line = service
        .insert_vehicle_line(
            version_id,
            brand_id,
            VehicleLineFields {
                name: payload.name,
                description: payload.description,
            },
        )
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(line))
}

pub async fn create_model(
    State(state): State<AppState>,
    Path((version_id, vehicle_line_id)): Path<(i32, i32)>,
    Json(payload): Json<ModelRequest>,
) -> Result<Json<staging_models::Model>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let model = service
        .insert_model(
            version_id,
            vehicle_line_id,
            ModelFields {
                name: payload.name,
                code: payload.code,
                release_year: payload.release_year,
                price: payload.price,
                is_foreign: payload.is_foreign,
            },
        )
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(model))
}

pub async fn create_trim(
    State(state): State<AppState>,
    Path((version_id, model_id)): Path<(i32, i32)>,
    Json(payload): Json<TrimRequest>,
) -> Result<Json<staging_trims::Model>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let trim = service
        .insert_trim(
            version_id,
            model_id,
            TrimFields {
                name: payload.name,
                car_type: payload.car_type,
                fuel_name: payload.fuel_name,
                cc: payload.cc,
                base_price: payload.base_price,
                description: payload.description,
            },
        )
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(trim))
}

pub async fn create_option(
    State(state): State<AppState>,
    Path((version_id, trim_id)): Path<(i32, i32)>,
    Json(payload): Json<OptionRequest>,
) -> Result<Json<staging_options::Model>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let option = service
        .insert_option(
            version_id,
            trim_id,
            OptionFields {
                name: payload.name,
                code: payload.code,
                category: payload.category,
                description: payload.description,
                price: payload.price,
                discounted_price: payload.discounted_price,
            },
        )
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(option))
}

// ---- reads -------------------------------------------------------------

pub async fn get_brand(
    State(state): State<AppState>,
    Path(brand_id): Path<i32>,
) -> Result<Json<staging_brands::Model>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let brand = service
        .get_brand(brand_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(brand))
}

pub async fn get_vehicle_line(
    State(state): State<AppState>,
    Path(vehicle_line_id): Path<i32>,
) -> Result<Json<staging_vehicle_lines::Model>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let line = service
        .get_vehicle_line(vehicle_line_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(line))
}

pub async fn get_model(
    State(state): State<AppState>,
    Path(model_id): Path<i32>,
) -> Result<Json<staging_models::Model>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let model = service
        .get_model(model_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(model))
}

pub async fn get_trim(
    State(state): State<AppState>,
    Path(trim_id): Path<i32>,
) -> Result<Json<staging_trims::Model>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let trim = service
        .get_trim(trim_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(trim))
}

pub async fn get_option(
    State(state): State<AppState>,
    Path(option_id): Path<i32>,
) -> Result<Json<staging_options::Model>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let option = service
        .get_option(option_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(option))
}

pub async fn list_brands(
    State(state): State<AppState>,
    Path(version_id): Path<i32>,
) -> Result<Json<Vec<staging_brands::Model>>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let brands = service
        .list_brands(version_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(brands))
}

pub async fn list_vehicle_lines(
    State(state): State<AppState>,
    Path(brand_id): Path<i32>,
) -> Result<Json<Vec<staging_vehicle_lines::Model>>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let lines = service
        .list_vehicle_lines(brand_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(lines))
}

pub async fn list_models(
    State(state): State<AppState>,
    Path(vehicle_line_id): Path<i32>,
) -> Result<Json<Vec<staging_models::Model>>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let models = service
        .list_models(vehicle_line_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(models))
}

pub async fn list_trims(
    State(state): State<AppState>,
    Path(model_id): Path<i32>,
) -> Result<Json<Vec<staging_trims::Model>>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let trims = service
        .list_trims(model_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(trims))
}

pub async fn list_options(
    State(state): State<AppState>,
    Path(trim_id): Path<i32>,
) -> Result<Json<Vec<staging_options::Model>>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let options = service
        .list_options(trim_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(options))
}

// ---- operator corrections ----------------------------------------------

pub async fn update_brand(
    State(state): State<AppState>,
    Path(brand_id): Path<i32>,
    Json(payload): Json<BrandRequest>,
) -> Result<Json<staging_brands::Model>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let brand = service
        .update_brand(
            brand_id,
            BrandFields {
                name: payload.name,
                country: payload.country,
                logo_url: payload.logo_url,
                manager: payload.manager,
            },
        )
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(brand))
}

pub async fn delete_brand(
    State(state): State<AppState>,
    Path(brand_id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let service = StagingService::new(state.db.clone());
    service
        .delete_brand(brand_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_vehicle_line(
    State(state): State<AppState>,
    Path(vehicle_line_id): Path<i32>,
    Json(payload): Json<VehicleLineRequest>,
) -> Result<Json<staging_vehicle_lines::Model>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let line = service
        .update_vehicle_line(
            vehicle_line_id,
            VehicleLineFields {
                name: payload.name,
                description: payload.description,
            },
        )
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(line))
}

pub async fn delete_vehicle_line(
    State(state): State<AppState>,
    Path(vehicle_line_id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let service = StagingService::new(state.db.clone());
    service
        .delete_vehicle_line(vehicle_line_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_model(
    State(state): State<AppState>,
    Path(model_id): Path<i32>,
    Json(payload): Json<ModelRequest>,
) -> Result<Json<staging_models::Model>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let model = service
        .update_model(
            model_id,
            ModelFields {
                name: payload.name,
                code: payload.code,
                release_year: payload.release_year,
                price: payload.price,
                is_foreign: payload.is_foreign,
            },
        )
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(model))
}

pub async fn delete_model(
    State(state): State<AppState>,
    Path(model_id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let service = StagingService::new(state.db.clone());
    service
        .delete_model(model_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_trim(
    State(state): State<AppState>,
    Path(trim_id): Path<i32>,
    Json(payload): Json<TrimRequest>,
) -> Result<Json<staging_trims::Model>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let trim = service
        .update_trim(
            trim_id,
            TrimFields {
                name: payload.name,
                car_type: payload.car_type,
                fuel_name: payload.fuel_name,
                cc: payload.cc,
                base_price: payload.base_price,
                description: payload.description,
            },
        )
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(trim))
}

pub async fn delete_trim(
    State(state): State<AppState>,
    Path(trim_id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let service = StagingService::new(state.db.clone());
    service
        .delete_trim(trim_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_option(
    State(state): State<AppState>,
    Path(option_id): Path<i32>,
    Json(payload): Json<OptionRequest>,
) -> Result<Json<staging_options::Model>, StatusCode> {
    let service = StagingService::new(state.db.clone());
    let option = service
        .update_option(
            option_id,
            OptionFields {
                name: payload.name,
                code: payload.code,
                category: payload.category,
                description: payload.description,
                price: payload.price,
                discounted_price: payload.discounted_price,
            },
        )
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(Json(option))
}

pub async fn delete_option(
    State(state): State<AppState>,
    Path(option_id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let service = StagingService::new(state.db.clone());
    service
        .delete_option(option_id)
        .await
        .map_err(|e| catalog_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}
