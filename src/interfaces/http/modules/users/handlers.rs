//! User management API handlers
//!
//! Admin-only CRUD endpoints for managing users.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::dto::{CreateUserRequest, UpdateUserRequest, UserDto};
use crate::domain::{RepositoryProvider, User, UserRole, UserStatus};
use crate::infrastructure::crypto::password::hash_password;
use crate::interfaces::http::common::{domain_error, ApiResponse, ValidatedJson};

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub repos: Arc<dyn RepositoryProvider>,
}

type UserResult<T> = Result<T, (StatusCode, Json<ApiResponse<UserDto>>)>;

async fn email_taken(
    state: &UserHandlerState,
    email: &str,
    except: Option<Uuid>,
) -> Result<bool, (StatusCode, Json<ApiResponse<UserDto>>)> {
    let needle = email.trim().to_lowercase();
    let users = state.repos.users().find_all().await.map_err(domain_error)?;
    Ok(users
        .iter()
        .any(|u| u.email.to_lowercase() == needle && Some(u.id) != except))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User list, most recent first", body = ApiResponse<Vec<UserDto>>)
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, (StatusCode, Json<ApiResponse<Vec<UserDto>>>)> {
    let users = state.repos.users().find_all().await.map_err(domain_error)?;
    let items = users.into_iter().map(UserDto::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<Uuid>,
) -> UserResult<Json<ApiResponse<UserDto>>> {
    let user = state
        .repos
        .users()
        .find_by_id(id)
        .await
        .map_err(domain_error)?;

    match user {
        Some(user) => Ok(Json(ApiResponse::success(UserDto::from(user)))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        )),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<UserDto>),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> UserResult<(StatusCode, Json<ApiResponse<UserDto>>)> {
    if email_taken(&state, &request.email, None).await? {
        return Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Email already taken")),
        ));
    }

    let password_hash = hash_password(&request.password).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    let user = User {
        id: Uuid::new_v4(),
        nom: request.nom.trim().to_string(),
        email: request.email.trim().to_string(),
        username: request.username.trim().to_string(),
        password_hash,
        role: request.role.as_deref().map(UserRole::from).unwrap_or_default(),
        entrepot_id: request.entrepot_id,
        status: request
            .status
            .as_deref()
            .map(UserStatus::from)
            .unwrap_or_default(),
        created_at: Utc::now(),
        last_login_at: None,
    };

    // the save itself enforces username uniqueness
    state
        .repos
        .users()
        .save(user.clone())
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> UserResult<Json<ApiResponse<UserDto>>> {
    let user = state
        .repos
        .users()
        .find_by_id(id)
        .await
        .map_err(domain_error)?;

    let Some(mut user) = user else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ));
    };

    if let Some(username) = request.username {
        let username = username.trim().to_string();
        let conflict = state
            .repos
            .users()
            .find_by_username(&username)
            .await
            .map_err(domain_error)?;
        if conflict.is_some_and(|c| c.id != user.id) {
            return Err((
                StatusCode::CONFLICT,
                Json(ApiResponse::error("Username already taken")),
            ));
        }
        user.username = username;
    }
    if let Some(email) = request.email {
        if email_taken(&state, &email, Some(user.id)).await? {
            return Err((
                StatusCode::CONFLICT,
                Json(ApiResponse::error("Email already taken")),
            ));
        }
        user.email = email.trim().to_string();
    }
    if let Some(nom) = request.nom {
        user.nom = nom.trim().to_string();
    }
    if let Some(password) = request.password {
        user.password_hash = hash_password(&password).map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            )
        })?;
    }
    if let Some(role) = request.role {
        user.role = UserRole::from(role.as_str());
    }
    if let Some(entrepot_id) = request.entrepot_id {
        user.entrepot_id = entrepot_id;
    }
    if let Some(status) = request.status {
        user.status = UserStatus::from(status.as_str());
    }

    state
        .repos
        .users()
        .update(user.clone())
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Last admin cannot be deleted")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    let user = state
        .repos
        .users()
        .find_by_id(id)
        .await
        .map_err(domain_error)?;

    let Some(user) = user else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ));
    };

    // at least one admin must remain
    if user.is_admin() {
        let users = state.repos.users().find_all().await.map_err(domain_error)?;
        let admins = users.iter().filter(|u| u.is_admin()).count();
        if admins <= 1 {
            return Err((
                StatusCode::CONFLICT,
                Json(ApiResponse::error(
                    "At least one administrator must remain",
                )),
            ));
        }
    }

    state
        .repos
        .users()
        .delete(id)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(())))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RepositoryProvider, User, UserRole, UserStatus};
    use crate::infrastructure::storage::InMemoryRepositories;

    fn state() -> UserHandlerState {
        UserHandlerState {
            repos: Arc::new(InMemoryRepositories::new()),
        }
    }

    async fn seed_admin(state: &UserHandlerState, username: &str) -> Uuid {
        let admin = User {
            id: Uuid::new_v4(),
            nom: "Administrateur".to_string(),
            email: format!("{}@local", username),
            username: username.to_string(),
            password_hash: String::new(),
            role: UserRole::Admin,
            entrepot_id: None,
            status: UserStatus::Actif,
            created_at: Utc::now(),
            last_login_at: None,
        };
        let id = admin.id;
        state.repos.users().save(admin).await.unwrap();
        id
    }

    #[tokio::test]
    async fn last_admin_cannot_be_deleted() {
        let state = state();
        let only_admin = seed_admin(&state, "admin").await;

        let err = delete_user(State(state.clone()), Path(only_admin))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::CONFLICT);

        // with a second admin the guard no longer applies
        seed_admin(&state, "backup").await;
        delete_user(State(state.clone()), Path(only_admin))
            .await
            .unwrap();
        assert!(state
            .repos
            .users()
            .find_by_id(only_admin)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn deleting_unknown_user_is_404() {
        let state = state();
        let err = delete_user(State(state), Path(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }
}
