//! SeaORM implementation of TruckRepository

use async_trait::async_trait;
use log::{debug, info, warn};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::truck::{
    AdvancedTruckStatus, HistoryEntry, Truck, TruckProducts, TruckRepository, TruckStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::truck;

pub struct SeaOrmTruckRepository {
    db: DatabaseConnection,
}

impl SeaOrmTruckRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

fn history_from_json(id: Uuid, value: serde_json::Value) -> Vec<HistoryEntry> {
    match serde_json::from_value(value) {
        Ok(history) => history,
        Err(e) => {
            // a bad row must not take the whole list view down
            warn!("Truck {}: unreadable history payload ({}), treating as empty", id, e);
            Vec::new()
        }
    }
}

fn products_from_json(id: Uuid, value: Option<serde_json::Value>) -> Option<TruckProducts> {
    let value = value?;
    match serde_json::from_value(value) {
        Ok(products) => Some(products),
        Err(e) => {
            warn!("Truck {}: unreadable products payload ({}), treating as absent", id, e);
            None
        }
    }
}

fn truck_from_model(model: truck::Model) -> Truck {
    Truck {
        id: model.id,
        entrepot_id: model.entrepot_id,
        immatriculation: model.immatriculation,
        transporteur: model.transporteur,
        transfert: model.transfert,
        cooperative: model.cooperative,
        kor: model.kor,
        th: model.th,
        statut: TruckStatus::from(model.statut.as_str()),
        advanced_status: model
            .advanced_status
            .as_deref()
            .and_then(AdvancedTruckStatus::parse),
        created_at: model.created_at,
        heure_arrivee: model.heure_arrivee,
        refused_at: model.refused_at,
        validated_at: model.validated_at,
        renvoye_at: model.renvoye_at,
        final_accepted_at: model.final_accepted_at,
        decharge_at: model.decharge_at,
        history: history_from_json(model.id, model.history),
        products: products_from_json(model.id, model.products),
        unread_for_admin: model.unread_for_admin,
        unread_for_gerant: model.unread_for_gerant,
        comment: model.comment,
        version: model.version as u64,
    }
}

fn active_model_from_truck(truck: &Truck, version: i64) -> DomainResult<truck::ActiveModel> {
    let history = serde_json::to_value(&truck.history)
        .map_err(|e| DomainError::Storage(format!("history serialization: {}", e)))?;
    let products = truck
        .products
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| DomainError::Storage(format!("products serialization: {}", e)))?;

    Ok(truck::ActiveModel {
        id: Set(truck.id),
        entrepot_id: Set(truck.entrepot_id),
        immatriculation: Set(truck.immatriculation.clone()),
        transporteur: Set(truck.transporteur.clone()),
        transfert: Set(truck.transfert.clone()),
        cooperative: Set(truck.cooperative.clone()),
        kor: Set(truck.kor.clone()),
        th: Set(truck.th.clone()),
        statut: Set(truck.statut.to_string()),
        advanced_status: Set(truck.advanced_status.map(|a| a.to_string())),
        created_at: Set(truck.created_at),
        heure_arrivee: Set(truck.heure_arrivee),
        refused_at: Set(truck.refused_at),
        validated_at: Set(truck.validated_at),
        renvoye_at: Set(truck.renvoye_at),
        final_accepted_at: Set(truck.final_accepted_at),
        decharge_at: Set(truck.decharge_at),
        history: Set(history),
        products: Set(products),
        unread_for_admin: Set(truck.unread_for_admin),
        unread_for_gerant: Set(truck.unread_for_gerant),
        comment: Set(truck.comment.clone()),
        version: Set(version),
    })
}

// ── TruckRepository impl ────────────────────────────────────────

#[async_trait]
impl TruckRepository for SeaOrmTruckRepository {
    async fn save(&self, truck: Truck) -> DomainResult<()> {
        debug!("Saving truck: {}", truck.id);

        let existing = truck::Entity::find_by_id(truck.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Err(DomainError::Conflict(format!(
                "Truck '{}' already exists",
                truck.id
            )));
        }

        let model = active_model_from_truck(&truck, truck.version as i64)?;
        model.insert(&self.db).await.map_err(db_err)?;

        info!("Truck saved: {} ({})", truck.immatriculation, truck.id);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Truck>> {
        let model = truck::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(truck_from_model))
    }

    async fn find_for_warehouse(&self, entrepot_id: Uuid) -> DomainResult<Vec<Truck>> {
        let models = truck::Entity::find()
            .filter(truck::Column::EntrepotId.eq(entrepot_id))
            .order_by_asc(truck::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(truck_from_model).collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<Truck>> {
        let models = truck::Entity::find()
            .order_by_asc(truck::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(truck_from_model).collect())
    }

    async fn update(&self, mut truck: Truck) -> DomainResult<Truck> {
        debug!("Updating truck: {} (version {})", truck.id, truck.version);

        let expected = truck.version as i64;
        let model = active_model_from_truck(&truck, expected + 1)?;

        // compare-and-swap on the version column: a concurrent writer has
        // already bumped it and the filter matches nothing
        let result = truck::Entity::update_many()
            .set(model)
            .filter(truck::Column::Id.eq(truck.id))
            .filter(truck::Column::Version.eq(expected))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            let exists = truck::Entity::find_by_id(truck.id)
                .one(&self.db)
                .await
                .map_err(db_err)?
                .is_some();
            return Err(if exists {
                DomainError::StaleVersion {
                    entity: "Truck",
                    id: truck.id.to_string(),
                }
            } else {
                DomainError::NotFound {
                    entity: "Truck",
                    field: "id",
                    value: truck.id.to_string(),
                }
            });
        }

        truck.version = (expected + 1) as u64;
        Ok(truck)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = truck::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Truck",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_for_warehouse(&self, entrepot_id: Uuid) -> DomainResult<u64> {
        let result = truck::Entity::delete_many()
            .filter(truck::Column::EntrepotId.eq(entrepot_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        info!(
            "Removed {} trucks of warehouse {}",
            result.rows_affected, entrepot_id
        );
        Ok(result.rows_affected)
    }
}
