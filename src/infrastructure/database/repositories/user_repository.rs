//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::domain::user::{User, UserRepository, UserRole, UserStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

fn user_from_model(model: user::Model) -> User {
    User {
        id: model.id,
        nom: model.nom,
        email: model.email,
        username: model.username,
        password_hash: model.password_hash,
        role: UserRole::from(model.role.as_str()),
        entrepot_id: model.entrepot_id,
        status: UserStatus::from(model.status.as_str()),
        created_at: model.created_at,
        last_login_at: model.last_login_at,
    }
}

fn active_model_from_user(user: &User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(user.id),
        nom: Set(user.nom.clone()),
        email: Set(user.email.clone()),
        username: Set(user.username.clone()),
        password_hash: Set(user.password_hash.clone()),
        role: Set(user.role.to_string()),
        entrepot_id: Set(user.entrepot_id),
        status: Set(user.status.to_string()),
        created_at: Set(user.created_at),
        last_login_at: Set(user.last_login_at),
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn save(&self, user: User) -> DomainResult<()> {
        debug!("Saving user: {}", user.username);

        if self.find_by_username(&user.username).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Username '{}' already taken",
                user.username
            )));
        }

        active_model_from_user(&user)
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(user::Column::Username)))
                    .eq(username.trim().to_lowercase()),
            )
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(user_from_model))
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn update(&self, user: User) -> DomainResult<()> {
        let existing = user::Entity::find_by_id(user.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: user.id.to_string(),
            });
        }

        active_model_from_user(&user)
            .update(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
