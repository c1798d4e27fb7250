use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use chrono::Utc;
use tracing::debug;

use crate::database::entities::{
    staging_brands, staging_models, staging_options, staging_trims, staging_vehicle_lines,
    versions,
};
use crate::errors::{CatalogError, CatalogResult};

/// Field bundles accepted by inserts and updates; updates overwrite the
/// row with the given values.
#[derive(Clone, Debug, Default)]
pub struct BrandFields {
    pub name: String,
    pub country: Option<String>,
    pub logo_url: Option<String>,
    pub manager: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct VehicleLineFields {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ModelFields {
    pub name: String,
    pub code: String,
    pub release_year: Option<i32>,
    pub price: Option<i64>,
    pub is_foreign: bool,
}

#[derive(Clone, Debug, Default)]
pub struct TrimFields {
    pub name: String,
    pub car_type: Option<String>,
    pub fuel_name: Option<String>,
    pub cc: Option<i32>,
    pub base_price: i64,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct OptionFields {
    pub name: String,
    pub code: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: i64,
    pub discounted_price: Option<i64>,
}

/// Row counts of one version's staging subtree, derived on read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct VersionStats {
    pub brand_count: u64,
    pub vehicle_line_count: u64,
    pub model_count: u64,
    pub trim_count: u64,
    pub option_count: u64,
}

/// Version-scoped CRUD over the staging tree.
///
/// Mutations are only permitted while the owning version is PENDING;
/// deletes cascade through all descendants in one transaction.
#[derive(Clone)]
pub struct StagingService {
    db: DatabaseConnection,
}

impl StagingService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ---- inserts -------------------------------------------------------

    /// Insert a brand under a PENDING version.
    pub async fn insert_brand(
        &self,
        version_id: i32,
        fields: BrandFields,
    ) -> CatalogResult<staging_brands::Model> {
        require_version_editable(&self.db, version_id).await?;

        let existing = staging_brands::Entity::find()
            .filter(staging_brands::Column::VersionId.eq(version_id))
            .filter(staging_brands::Column::Name.eq(fields.name.clone()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CatalogError::DuplicateStagingName {
                kind: "brand",
                name: fields.name,
                parent_id: version_id,
            });
        }

        insert_brand_row(&self.db, version_id, &fields).await
    }

    /// Insert a vehicle line under a brand belonging to `version_id`.
    pub async fn insert_vehicle_line(
        &self,
        version_id: i32,
        brand_id: i32,
        fields: VehicleLineFields,
    ) -> CatalogResult<staging_vehicle_lines::Model> {
        require_version_editable(&self.db, version_id).await?;

        let brand = staging_brands::Entity::find_by_id(brand_id)
            .one(&self.db)
            .await?
            .filter(|b| b.version_id == version_id)
            .ok_or(CatalogError::MissingParent {
                kind: "brand",
                id: brand_id,
            })?;

        let existing = staging_vehicle_lines::Entity::find()
            .filter(staging_vehicle_lines::Column::BrandId.eq(brand.id))
            .filter(staging_vehicle_lines::Column::Name.eq(fields.name.clone()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CatalogError::DuplicateStagingName {
                kind: "vehicle line",
                name: fields.name,
                parent_id: brand.id,
            });
        }

        insert_vehicle_line_row(&self.db, brand.id, &fields).await
    }

    /// Insert a model under a vehicle line belonging to `version_id`.
    /// The model code must be unique across the whole version.
    pub async fn insert_model(
        &self,
        version_id: i32,
        vehicle_line_id: i32,
        fields: ModelFields,
    ) -> CatalogResult<staging_models::Model> {
        require_version_editable(&self.db, version_id).await?;

        let line = staging_vehicle_lines::Entity::find_by_id(vehicle_line_id)
            .one(&self.db)
            .await?;
        let line = match line {
            Some(line) => {
                let owner = brand_version_id(&self.db, line.brand_id).await?;
                if owner != Some(version_id) {
                    return Err(CatalogError::MissingParent {
                        kind: "vehicle line",
                        id: vehicle_line_id,
                    });
                }
                line
            }
            None => {
                return Err(CatalogError::MissingParent {
                    kind: "vehicle line",
                    id: vehicle_line_id,
                })
            }
        };

        if model_code_exists(&self.db, version_id, &fields.code).await? {
            return Err(CatalogError::DuplicateStagingName {
                kind: "model",
                name: fields.code,
                parent_id: line.id,
            });
        }

        insert_model_row(&self.db, line.id, &fields).await
    }

    /// Insert a trim under a model belonging to `version_id`.
    pub async fn insert_trim(
        &self,
        version_id: i32,
        model_id: i32,
        fields: TrimFields,
    ) -> CatalogResult<staging_trims::Model> {
        require_version_editable(&self.db, version_id).await?;

        let model = staging_models::Entity::find_by_id(model_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::MissingParent {
                kind: "model",
                id: model_id,
            })?;
        if model_version_id(&self.db, &model).await? != Some(version_id) {
            return Err(CatalogError::MissingParent {
                kind: "model",
                id: model_id,
            });
        }

        let existing = staging_trims::Entity::find()
            .filter(staging_trims::Column::ModelId.eq(model.id))
            .filter(staging_trims::Column::Name.eq(fields.name.clone()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CatalogError::DuplicateStagingName {
                kind: "trim",
                name: fields.name,
                parent_id: model.id,
            });
        }

        insert_trim_row(&self.db, model.id, &fields).await
    }

    /// Insert an option under a trim belonging to `version_id`.
    pub async fn insert_option(
        &self,
        version_id: i32,
        trim_id: i32,
        fields: OptionFields,
    ) -> CatalogResult<staging_options::Model> {
        require_version_editable(&self.db, version_id).await?;

        let trim = staging_trims::Entity::find_by_id(trim_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::MissingParent {
                kind: "trim",
                id: trim_id,
            })?;
        if trim_version_id(&self.db, &trim).await? != Some(version_id) {
            return Err(CatalogError::MissingParent {
                kind: "trim",
                id: trim_id,
            });
        }

        let existing = staging_options::Entity::find()
            .filter(staging_options::Column::TrimId.eq(trim.id))
            .filter(staging_options::Column::Name.eq(fields.name.clone()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CatalogError::DuplicateStagingName {
                kind: "option",
                name: fields.name,
                parent_id: trim.id,
            });
        }

        insert_option_row(&self.db, trim.id, &fields).await
    }

    // ---- reads ---------------------------------------------------------

    pub async fn get_brand(&self, brand_id: i32) -> CatalogResult<staging_brands::Model> {
        staging_brands::Entity::find_by_id(brand_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::StagingRowNotFound {
                kind: "brand",
                id: brand_id,
            })
    }

    pub async fn get_vehicle_line(
        &self,
        vehicle_line_id: i32,
    ) -> CatalogResult<staging_vehicle_lines::Model> {
        staging_vehicle_lines::Entity::find_by_id(vehicle_line_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::StagingRowNotFound {
                kind: "vehicle line",
                id: vehicle_line_id,
            })
    }

    pub async fn get_model(&self, model_id: i32) -> CatalogResult<staging_models::Model> {
        staging_models::Entity::find_by_id(model_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::StagingRowNotFound {
                kind: "model",
                id: model_id,
            })
    }

    pub async fn get_trim(&self, trim_id: i32) -> CatalogResult<staging_trims::Model> {
        staging_trims::Entity::find_by_id(trim_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::StagingRowNotFound {
                kind: "trim",
                id: trim_id,
            })
    }

    pub async fn get_option(&self, option_id: i32) -> CatalogResult<staging_options::Model> {
        staging_options::Entity::find_by_id(option_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::StagingRowNotFound {
                kind: "option",
                id: option_id,
            })
    }

    pub async fn list_brands(&self, version_id: i32) -> CatalogResult<Vec<staging_brands::Model>> {
        Ok(staging_brands::Entity::find()
            .filter(staging_brands::Column::VersionId.eq(version_id))
            .order_by_asc(staging_brands::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn list_vehicle_lines(
        &self,
        brand_id: i32,
    ) -> CatalogResult<Vec<staging_vehicle_lines::Model>> {
        Ok(staging_vehicle_lines::Entity::find()
            .filter(staging_vehicle_lines::Column::BrandId.eq(brand_id))
            .order_by_asc(staging_vehicle_lines::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn list_models(
        &self,
        vehicle_line_id: i32,
    ) -> CatalogResult<Vec<staging_models::Model>> {
        Ok(staging_models::Entity::find()
            .filter(staging_models::Column::VehicleLineId.eq(vehicle_line_id))
            .order_by_asc(staging_models::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn list_trims(&self, model_id: i32) -> CatalogResult<Vec<staging_trims::Model>> {
        Ok(staging_trims::Entity::find()
            .filter(staging_trims::Column::ModelId.eq(model_id))
            .order_by_asc(staging_trims::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn list_options(&self, trim_id: i32) -> CatalogResult<Vec<staging_options::Model>> {
        Ok(staging_options::Entity::find()
            .filter(staging_options::Column::TrimId.eq(trim_id))
            .order_by_asc(staging_options::Column::Id)
            .all(&self.db)
            .await?)
    }

    // ---- updates -------------------------------------------------------

    pub async fn update_brand(
        &self,
        brand_id: i32,
        fields: BrandFields,
    ) -> CatalogResult<staging_brands::Model> {
        let brand = staging_brands::Entity::find_by_id(brand_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::StagingRowNotFound {
                kind: "brand",
                id: brand_id,
            })?;
        require_version_editable(&self.db, brand.version_id).await?;

        let mut active: staging_brands::ActiveModel = brand.into();
        active.name = Set(fields.name);
        active.country = Set(fields.country);
        active.logo_url = Set(fields.logo_url);
        active.manager = Set(fields.manager);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    pub async fn update_vehicle_line(
        &self,
        vehicle_line_id: i32,
        fields: VehicleLineFields,
    ) -> CatalogResult<staging_vehicle_lines::Model> {
        let line = staging_vehicle_lines::Entity::find_by_id(vehicle_line_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::StagingRowNotFound {
                kind: "vehicle line",
                id: vehicle_line_id,
            })?;
        let version_id =
            brand_version_id(&self.db, line.brand_id)
                .await?
                .ok_or(CatalogError::MissingParent {
                    kind: "brand",
                    id: line.brand_id,
                })?;
        require_version_editable(&self.db, version_id).await?;

        let mut active: staging_vehicle_lines::ActiveModel = line.into();
        active.name = Set(fields.name);
        active.description = Set(fields.description);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    pub async fn update_model(
        &self,
        model_id: i32,
        fields: ModelFields,
    ) -> CatalogResult<staging_models::Model> {
        let model = staging_models::Entity::find_by_id(model_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::StagingRowNotFound {
                kind: "model",
                id: model_id,
            })?;
        let version_id = model_version_id(&self.db, &model)
            .await?
            .ok_or(CatalogError::MissingParent {
                kind: "vehicle line",
                id: model.vehicle_line_id,
            })?;
        require_version_editable(&self.db, version_id).await?;

        if fields.code != model.code && model_code_exists(&self.db, version_id, &fields.code).await?
        {
            return Err(CatalogError::DuplicateStagingName {
                kind: "model",
                name: fields.code,
                parent_id: model.vehicle_line_id,
            });
        }

        let mut active: staging_models::ActiveModel = model.into();
        active.name = Set(fields.name);
        active.code = Set(fields.code);
        active.release_year = Set(fields.release_year);
        active.price = Set(fields.price);
        active.is_foreign = Set(fields.is_foreign);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    pub async fn update_trim(
        &self,
        trim_id: i32,
        fields: TrimFields,
    ) -> CatalogResult<staging_trims::Model> {
        let trim = staging_trims::Entity::find_by_id(trim_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::StagingRowNotFound {
                kind: "trim",
                id: trim_id,
            })?;
        let version_id = trim_version_id(&self.db, &trim)
            .await?
            .ok_or(CatalogError::MissingParent {
                kind: "model",
                id: trim.model_id,
            })?;
        require_version_editable(&self.db, version_id).await?;

        let mut active: staging_trims::ActiveModel = trim.into();
        active.name = Set(fields.name);
        active.car_type = Set(fields.car_type);
        active.fuel_name = Set(fields.fuel_name);
        active.cc = Set(fields.cc);
        active.base_price = Set(fields.base_price);
        active.description = Set(fields.description);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    pub async fn update_option(
        &self,
        option_id: i32,
        fields: OptionFields,
    ) -> CatalogResult<staging_options::Model> {
        let option = staging_options::Entity::find_by_id(option_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::StagingRowNotFound {
                kind: "option",
                id: option_id,
            })?;
        let trim = staging_trims::Entity::find_by_id(option.trim_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::MissingParent {
                kind: "trim",
                id: option.trim_id,
            })?;
        let version_id = trim_version_id(&self.db, &trim)
            .await?
            .ok_or(CatalogError::MissingParent {
                kind: "model",
                id: trim.model_id,
            })?;
        require_version_editable(&self.db, version_id).await?;

        let mut active: staging_options::ActiveModel = option.into();
        active.name = Set(fields.name);
        active.code = Set(fields.code);
        active.category = Set(fields.category);
        active.description = Set(fields.description);
        active.price = Set(fields.price);
        active.discounted_price = Set(fields.discounted_price);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    // ---- deletes -------------------------------------------------------

    /// Delete a brand and its whole subtree in one transaction.
    pub async fn delete_brand(&self, brand_id: i32) -> CatalogResult<()> {
        let brand = staging_brands::Entity::find_by_id(brand_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::StagingRowNotFound {
                kind: "brand",
                id: brand_id,
            })?;
        require_version_editable(&self.db, brand.version_id).await?;

        let txn = self.db.begin().await?;
        delete_brand_subtrees(&txn, &[brand.id]).await?;
        txn.commit().await?;
        Ok(())
    }

    pub async fn delete_vehicle_line(&self, vehicle_line_id: i32) -> CatalogResult<()> {
        let line = staging_vehicle_lines::Entity::find_by_id(vehicle_line_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::StagingRowNotFound {
                kind: "vehicle line",
                id: vehicle_line_id,
            })?;
        let version_id =
            brand_version_id(&self.db, line.brand_id)
                .await?
                .ok_or(CatalogError::MissingParent {
                    kind: "brand",
                    id: line.brand_id,
                })?;
        require_version_editable(&self.db, version_id).await?;

        let txn = self.db.begin().await?;
        delete_line_subtrees(&txn, &[line.id]).await?;
        txn.commit().await?;
        Ok(())
    }

    pub async fn delete_model(&self, model_id: i32) -> CatalogResult<()> {
        let model = staging_models::Entity::find_by_id(model_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::StagingRowNotFound {
                kind: "model",
                id: model_id,
            })?;
        let version_id = model_version_id(&self.db, &model)
            .await?
            .ok_or(CatalogError::MissingParent {
                kind: "vehicle line",
                id: model.vehicle_line_id,
            })?;
        require_version_editable(&self.db, version_id).await?;

        let txn = self.db.begin().await?;
        delete_model_subtrees(&txn, &[model.id]).await?;
        txn.commit().await?;
        Ok(())
    }

    pub async fn delete_trim(&self, trim_id: i32) -> CatalogResult<()> {
        let trim = staging_trims::Entity::find_by_id(trim_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::StagingRowNotFound {
                kind: "trim",
                id: trim_id,
            })?;
        let version_id = trim_version_id(&self.db, &trim)
            .await?
            .ok_or(CatalogError::MissingParent {
                kind: "model",
                id: trim.model_id,
            })?;
        require_version_editable(&self.db, version_id).await?;

        let txn = self.db.begin().await?;
        delete_trim_subtrees(&txn, &[trim.id]).await?;
        txn.commit().await?;
        Ok(())
    }

    pub async fn delete_option(&self, option_id: i32) -> CatalogResult<()> {
        let option = staging_options::Entity::find_by_id(option_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::StagingRowNotFound {
                kind: "option",
                id: option_id,
            })?;
        let trim = staging_trims::Entity::find_by_id(option.trim_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::MissingParent {
                kind: "trim",
                id: option.trim_id,
            })?;
        let version_id = trim_version_id(&self.db, &trim)
            .await?
            .ok_or(CatalogError::MissingParent {
                kind: "model",
                id: trim.model_id,
            })?;
        require_version_editable(&self.db, version_id).await?;

        staging_options::Entity::delete_by_id(option.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

// ---- shared row-level helpers ------------------------------------------
//
// The orchestrator runs these against one per-sheet transaction; the
// service methods above run them against the pooled connection.

pub(crate) async fn insert_brand_row<C: ConnectionTrait>(
    conn: &C,
    version_id: i32,
    fields: &BrandFields,
) -> CatalogResult<staging_brands::Model> {
    let row = staging_brands::ActiveModel {
        version_id: Set(version_id),
        name: Set(fields.name.clone()),
        country: Set(fields.country.clone()),
        logo_url: Set(fields.logo_url.clone()),
        manager: Set(fields.manager.clone()),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    Ok(row.insert(conn).await?)
}

pub(crate) async fn insert_vehicle_line_row<C: ConnectionTrait>(
    conn: &C,
    brand_id: i32,
    fields: &VehicleLineFields,
) -> CatalogResult<staging_vehicle_lines::Model> {
    let row = staging_vehicle_lines::ActiveModel {
        brand_id: Set(brand_id),
        name: Set(fields.name.clone()),
        description: Set(fields.description.clone()),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    Ok(row.insert(conn).await?)
}

pub(crate) async fn insert_model_row<C: ConnectionTrait>(
    conn: &C,
    vehicle_line_id: i32,
    fields: &ModelFields,
) -> CatalogResult<staging_models::Model> {
    let row = staging_models::ActiveModel {
        vehicle_line_id: Set(vehicle_line_id),
        name: Set(fields.name.clone()),
        code: Set(fields.code.clone()),
        release_year: Set(fields.release_year),
        price: Set(fields.price),
        is_foreign: Set(fields.is_foreign),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    Ok(row.insert(conn).await?)
}

pub(crate) async fn insert_trim_row<C: ConnectionTrait>(
    conn: &C,
    model_id: i32,
    fields: &TrimFields,
) -> CatalogResult<staging_trims::Model> {
    let row = staging_trims::ActiveModel {
        model_id: Set(model_id),
        name: Set(fields.name.clone()),
        car_type: Set(fields.car_type.clone()),
        fuel_name: Set(fields.fuel_name.clone()),
        cc: Set(fields.cc),
        base_price: Set(fields.base_price),
        description: Set(fields.description.clone()),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    Ok(row.insert(conn).await?)
}

pub(crate) async fn insert_option_row<C: ConnectionTrait>(
    conn: &C,
    trim_id: i32,
    fields: &OptionFields,
) -> CatalogResult<staging_options::Model> {
    let row = staging_options::ActiveModel {
        trim_id: Set(trim_id),
        name: Set(fields.name.clone()),
        code: Set(fields.code.clone()),
        category: Set(fields.category.clone()),
        description: Set(fields.description.clone()),
        price: Set(fields.price),
        discounted_price: Set(fields.discounted_price),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    Ok(row.insert(conn).await?)
}

/// Load a version and require it to be editable (PENDING).
pub(crate) async fn require_version_editable<C: ConnectionTrait>(
    conn: &C,
    version_id: i32,
) -> CatalogResult<versions::Model> {
    let version = versions::Entity::find_by_id(version_id)
        .one(conn)
        .await?
        .ok_or(CatalogError::VersionNotFound(version_id))?;

    if !version.status().is_editable() {
        return Err(CatalogError::VersionNotEditable {
            id: version_id,
            status: version.approval_status.clone(),
        });
    }
    Ok(version)
}

pub(crate) async fn brand_version_id<C: ConnectionTrait>(
    conn: &C,
    brand_id: i32,
) -> Result<Option<i32>, sea_orm::DbErr> {
    Ok(staging_brands::Entity::find_by_id(brand_id)
        .one(conn)
        .await?
        .map(|b| b.version_id))
}

pub(crate) async fn model_version_id<C: ConnectionTrait>(
    conn: &C,
    model: &staging_models::Model,
) -> Result<Option<i32>, sea_orm::DbErr> {
    let line = staging_vehicle_lines::Entity::find_by_id(model.vehicle_line_id)
        .one(conn)
        .await?;
    match line {
        Some(line) => brand_version_id(conn, line.brand_id).await,
        None => Ok(None),
    }
}

pub(crate) async fn trim_version_id<C: ConnectionTrait>(
    conn: &C,
    trim: &staging_trims::Model,
) -> Result<Option<i32>, sea_orm::DbErr> {
    let model = staging_models::Entity::find_by_id(trim.model_id)
        .one(conn)
        .await?;
    match model {
        Some(model) => model_version_id(conn, &model).await,
        None => Ok(None),
    }
}

/// Whether a model code is already taken anywhere in the version.
pub(crate) async fn model_code_exists<C: ConnectionTrait>(
    conn: &C,
    version_id: i32,
    code: &str,
) -> Result<bool, sea_orm::DbErr> {
    let line_ids = version_line_ids(conn, version_id).await?;
    if line_ids.is_empty() {
        return Ok(false);
    }
    let count = staging_models::Entity::find()
        .filter(staging_models::Column::VehicleLineId.is_in(line_ids))
        .filter(staging_models::Column::Code.eq(code))
        .count(conn)
        .await?;
    Ok(count > 0)
}

// ---- subtree walks -----------------------------------------------------

pub(crate) async fn version_brand_ids<C: ConnectionTrait>(
    conn: &C,
    version_id: i32,
) -> Result<Vec<i32>, sea_orm::DbErr> {
    Ok(staging_brands::Entity::find()
        .filter(staging_brands::Column::VersionId.eq(version_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|b| b.id)
        .collect())
}

pub(crate) async fn version_line_ids<C: ConnectionTrait>(
    conn: &C,
    version_id: i32,
) -> Result<Vec<i32>, sea_orm::DbErr> {
    let brand_ids = version_brand_ids(conn, version_id).await?;
    line_ids_under(conn, &brand_ids).await
}

async fn line_ids_under<C: ConnectionTrait>(
    conn: &C,
    brand_ids: &[i32],
) -> Result<Vec<i32>, sea_orm::DbErr> {
    if brand_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(staging_vehicle_lines::Entity::find()
        .filter(staging_vehicle_lines::Column::BrandId.is_in(brand_ids.to_vec()))
        .all(conn)
        .await?
        .into_iter()
        .map(|l| l.id)
        .collect())
}

async fn model_ids_under<C: ConnectionTrait>(
    conn: &C,
    line_ids: &[i32],
) -> Result<Vec<i32>, sea_orm::DbErr> {
    if line_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(staging_models::Entity::find()
        .filter(staging_models::Column::VehicleLineId.is_in(line_ids.to_vec()))
        .all(conn)
        .await?
        .into_iter()
        .map(|m| m.id)
        .collect())
}

async fn trim_ids_under<C: ConnectionTrait>(
    conn: &C,
    model_ids: &[i32],
) -> Result<Vec<i32>, sea_orm::DbErr> {
    if model_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(staging_trims::Entity::find()
        .filter(staging_trims::Column::ModelId.is_in(model_ids.to_vec()))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect())
}

/// Delete everything staged under a version. Runs inside the caller's
/// transaction.
pub(crate) async fn delete_version_subtree<C: ConnectionTrait>(
    conn: &C,
    version_id: i32,
) -> CatalogResult<()> {
    let brand_ids = version_brand_ids(conn, version_id).await?;
    delete_brand_subtrees(conn, &brand_ids).await
}

async fn delete_brand_subtrees<C: ConnectionTrait>(
    conn: &C,
    brand_ids: &[i32],
) -> CatalogResult<()> {
    let line_ids = line_ids_under(conn, brand_ids).await?;
    delete_line_subtrees(conn, &line_ids).await?;

    if !brand_ids.is_empty() {
        staging_brands::Entity::delete_many()
            .filter(staging_brands::Column::Id.is_in(brand_ids.to_vec()))
            .exec(conn)
            .await?;
    }
    debug!("deleted {} staging brand subtrees", brand_ids.len());
    Ok(())
}

async fn delete_line_subtrees<C: ConnectionTrait>(conn: &C, line_ids: &[i32]) -> CatalogResult<()> {
    let model_ids = model_ids_under(conn, line_ids).await?;
    delete_model_subtrees(conn, &model_ids).await?;

    if !line_ids.is_empty() {
        staging_vehicle_lines::Entity::delete_many()
            .filter(staging_vehicle_lines::Column::Id.is_in(line_ids.to_vec()))
            .exec(conn)
            .await?;
    }
    Ok(())
}

async fn delete_model_subtrees<C: ConnectionTrait>(
    conn: &C,
    model_ids: &[i32],
) -> CatalogResult<()> {
    let trim_ids = trim_ids_under(conn, model_ids).await?;
    delete_trim_subtrees(conn, &trim_ids).await?;

    if !model_ids.is_empty() {
        staging_models::Entity::delete_many()
            .filter(staging_models::Column::Id.is_in(model_ids.to_vec()))
            .exec(conn)
            .await?;
    }
    Ok(())
}

async fn delete_trim_subtrees<C: ConnectionTrait>(conn: &C, trim_ids: &[i32]) -> CatalogResult<()> {
    if trim_ids.is_empty() {
        return Ok(());
    }
    staging_options::Entity::delete_many()
        .filter(staging_options::Column::TrimId.is_in(trim_ids.to_vec()))
        .exec(conn)
        .await?;
    staging_trims::Entity::delete_many()
        .filter(staging_trims::Column::Id.is_in(trim_ids.to_vec()))
        .exec(conn)
        .await?;
    Ok(())
}

/// Count the staging rows under a version, level by level.
pub(crate) async fn collect_version_stats<C: ConnectionTrait>(
    conn: &C,
    version_id: i32,
) -> Result<VersionStats, sea_orm::DbErr> {
    let brand_ids = version_brand_ids(conn, version_id).await?;
    let line_ids = line_ids_under(conn, &brand_ids).await?;
    let model_ids = model_ids_under(conn, &line_ids).await?;
    let trim_ids = trim_ids_under(conn, &model_ids).await?;

    let option_count = if trim_ids.is_empty() {
        0
    } else {
        staging_options::Entity::find()
            .filter(staging_options::Column::TrimId.is_in(trim_ids.clone()))
            .count(conn)
            .await?
    };

    Ok(VersionStats {
        brand_count: brand_ids.len() as u64,
        vehicle_line_count: line_ids.len() as u64,
        model_count: model_ids.len() as u64,
        trim_count: trim_ids.len() as u64,
        option_count,
    })
}
