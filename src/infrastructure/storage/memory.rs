//! In-memory storage implementation
//!
//! `DashMap`-backed repositories for development and tests. List results
//! come back ordered by `created_at` so they match the registration order
//! a database would return.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::repositories::RepositoryProvider;
use crate::domain::truck::{Truck, TruckRepository};
use crate::domain::user::{User, UserRepository};
use crate::domain::warehouse::{Warehouse, WarehouseRepository};
use crate::domain::{DomainError, DomainResult};

/// In-memory repositories for development and testing
#[derive(Default)]
pub struct InMemoryRepositories {
    trucks: InMemoryTruckRepository,
    warehouses: InMemoryWarehouseRepository,
    users: InMemoryUserRepository,
}

impl InMemoryRepositories {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositories {
    fn trucks(&self) -> &dyn TruckRepository {
        &self.trucks
    }

    fn warehouses(&self) -> &dyn WarehouseRepository {
        &self.warehouses
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}

// ── Trucks ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryTruckRepository {
    trucks: DashMap<Uuid, Truck>,
}

#[async_trait]
impl TruckRepository for InMemoryTruckRepository {
    async fn save(&self, truck: Truck) -> DomainResult<()> {
        if self.trucks.contains_key(&truck.id) {
            return Err(DomainError::Conflict(format!(
                "Truck '{}' already exists",
                truck.id
            )));
        }
        self.trucks.insert(truck.id, truck);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Truck>> {
        Ok(self.trucks.get(&id).map(|t| t.clone()))
    }

    async fn find_for_warehouse(&self, entrepot_id: Uuid) -> DomainResult<Vec<Truck>> {
        let mut out: Vec<Truck> = self
            .trucks
            .iter()
            .filter(|t| t.entrepot_id == entrepot_id)
            .map(|t| t.clone())
            .collect();
        out.sort_by_key(|t| t.created_at);
        Ok(out)
    }

    async fn find_all(&self) -> DomainResult<Vec<Truck>> {
        let mut out: Vec<Truck> = self.trucks.iter().map(|t| t.clone()).collect();
        out.sort_by_key(|t| t.created_at);
        Ok(out)
    }

    async fn update(&self, mut truck: Truck) -> DomainResult<Truck> {
        let Some(mut stored) = self.trucks.get_mut(&truck.id) else {
            return Err(DomainError::NotFound {
                entity: "Truck",
                field: "id",
                value: truck.id.to_string(),
            });
        };

        if stored.version != truck.version {
            return Err(DomainError::StaleVersion {
                entity: "Truck",
                id: truck.id.to_string(),
            });
        }

        truck.version += 1;
        *stored = truck.clone();
        Ok(truck)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.trucks.remove(&id).ok_or(DomainError::NotFound {
            entity: "Truck",
            field: "id",
            value: id.to_string(),
        })?;
        Ok(())
    }

    async fn delete_for_warehouse(&self, entrepot_id: Uuid) -> DomainResult<u64> {
        let before = self.trucks.len();
        self.trucks.retain(|_, t| t.entrepot_id != entrepot_id);
        Ok((before - self.trucks.len()) as u64)
    }
}

// ── Warehouses ─────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryWarehouseRepository {
    warehouses: DashMap<Uuid, Warehouse>,
}

#[async_trait]
impl WarehouseRepository for InMemoryWarehouseRepository {
    async fn save(&self, warehouse: Warehouse) -> DomainResult<()> {
        if self.warehouses.contains_key(&warehouse.id) {
            return Err(DomainError::Conflict(format!(
                "Warehouse '{}' already exists",
                warehouse.id
            )));
        }
        self.warehouses.insert(warehouse.id, warehouse);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Warehouse>> {
        Ok(self.warehouses.get(&id).map(|w| w.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Warehouse>> {
        let mut out: Vec<Warehouse> = self.warehouses.iter().map(|w| w.clone()).collect();
        out.sort_by_key(|w| w.created_at);
        Ok(out)
    }

    async fn update(&self, warehouse: Warehouse) -> DomainResult<()> {
        if !self.warehouses.contains_key(&warehouse.id) {
            return Err(DomainError::NotFound {
                entity: "Warehouse",
                field: "id",
                value: warehouse.id.to_string(),
            });
        }
        self.warehouses.insert(warehouse.id, warehouse);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.warehouses.remove(&id).ok_or(DomainError::NotFound {
            entity: "Warehouse",
            field: "id",
            value: id.to_string(),
        })?;
        Ok(())
    }
}

// ── Users ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<Uuid, User>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: User) -> DomainResult<()> {
        if self.find_by_username(&user.username).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Username '{}' already taken",
                user.username
            )));
        }
        self.users.insert(user.id, user);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let needle = username.trim().to_lowercase();
        Ok(self
            .users
            .iter()
            .find(|u| u.username.to_lowercase() == needle)
            .map(|u| u.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        let mut out: Vec<User> = self.users.iter().map(|u| u.clone()).collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn update(&self, user: User) -> DomainResult<()> {
        if !self.users.contains_key(&user.id) {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: user.id.to_string(),
            });
        }
        self.users.insert(user.id, user);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.users.remove(&id).ok_or(DomainError::NotFound {
            entity: "User",
            field: "id",
            value: id.to_string(),
        })?;
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::truck::{ReceptionStatus, TruckRegistration};

    fn sample_truck(entrepot_id: Uuid) -> Truck {
        Truck::register(
            entrepot_id,
            TruckRegistration {
                immatriculation: "AB-123-CD".to_string(),
                transporteur: "Acme".to_string(),
                transfert: String::new(),
                cooperative: String::new(),
            },
            ReceptionStatus::Enregistrer,
        )
    }

    #[tokio::test]
    async fn stale_version_update_is_rejected() {
        let repo = InMemoryTruckRepository::default();
        let truck = sample_truck(Uuid::new_v4());
        repo.save(truck.clone()).await.unwrap();

        // first writer wins and bumps the version
        let updated = repo.update(truck.clone()).await.unwrap();
        assert_eq!(updated.version, 1);

        // second writer still holds version 0
        let err = repo.update(truck).await.unwrap_err();
        assert!(matches!(err, DomainError::StaleVersion { .. }));
    }

    #[tokio::test]
    async fn delete_for_warehouse_counts_removed() {
        let repo = InMemoryTruckRepository::default();
        let entrepot = Uuid::new_v4();
        repo.save(sample_truck(entrepot)).await.unwrap();
        repo.save(sample_truck(entrepot)).await.unwrap();
        repo.save(sample_truck(Uuid::new_v4())).await.unwrap();

        assert_eq!(repo.delete_for_warehouse(entrepot).await.unwrap(), 2);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn username_lookup_is_case_insensitive() {
        let repo = InMemoryUserRepository::default();
        let user = User {
            id: Uuid::new_v4(),
            nom: "Administrateur".to_string(),
            email: "admin@local".to_string(),
            username: "Admin".to_string(),
            password_hash: String::new(),
            role: crate::domain::UserRole::Admin,
            entrepot_id: None,
            status: crate::domain::UserStatus::Actif,
            created_at: chrono::Utc::now(),
            last_login_at: None,
        };
        repo.save(user).await.unwrap();

        assert!(repo.find_by_username("admin").await.unwrap().is_some());
        assert!(repo.find_by_username("ADMIN").await.unwrap().is_some());
        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }
}
