//! SeaORM implementation of WarehouseRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::domain::warehouse::{Warehouse, WarehouseRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::warehouse;

pub struct SeaOrmWarehouseRepository {
    db: DatabaseConnection,
}

impl SeaOrmWarehouseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

fn warehouse_from_model(model: warehouse::Model) -> Warehouse {
    Warehouse {
        id: model.id,
        name: model.name,
        location: model.location,
        image_url: model.image_url,
        created_at: model.created_at,
    }
}

fn active_model_from_warehouse(warehouse: &Warehouse) -> warehouse::ActiveModel {
    warehouse::ActiveModel {
        id: Set(warehouse.id),
        name: Set(warehouse.name.clone()),
        location: Set(warehouse.location.clone()),
        image_url: Set(warehouse.image_url.clone()),
        created_at: Set(warehouse.created_at),
    }
}

#[async_trait]
impl WarehouseRepository for SeaOrmWarehouseRepository {
    async fn save(&self, warehouse: Warehouse) -> DomainResult<()> {
        debug!("Saving warehouse: {}", warehouse.id);

        let existing = warehouse::Entity::find_by_id(warehouse.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Err(DomainError::Conflict(format!(
                "Warehouse '{}' already exists",
                warehouse.id
            )));
        }

        active_model_from_warehouse(&warehouse)
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Warehouse>> {
        let model = warehouse::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(warehouse_from_model))
    }

    async fn find_all(&self) -> DomainResult<Vec<Warehouse>> {
        let models = warehouse::Entity::find()
            .order_by_asc(warehouse::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(warehouse_from_model).collect())
    }

    async fn update(&self, warehouse: Warehouse) -> DomainResult<()> {
        let existing = warehouse::Entity::find_by_id(warehouse.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Warehouse",
                field: "id",
                value: warehouse.id.to_string(),
            });
        }

        active_model_from_warehouse(&warehouse)
            .update(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = warehouse::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Warehouse",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }
}
