//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::domain::Actor;
use crate::infrastructure::crypto::jwt::{verify_token, Claims, JwtConfig};

/// Authentication state for the JWT middleware
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Authenticated user information extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub role: String,
    /// Warehouse the account is bound to; `None` for unrestricted scope
    pub entrepot_id: Option<Uuid>,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
            entrepot_id: claims
                .entrepot_id
                .as_deref()
                .and_then(|id| Uuid::parse_str(id).ok()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// Which side of the workflow this account acts on
    pub fn actor(&self) -> Actor {
        if self.is_admin() {
            Actor::Admin
        } else {
            Actor::Gerant
        }
    }

    /// Whether this account may touch trucks of the given warehouse.
    pub fn can_access_warehouse(&self, entrepot_id: Uuid) -> bool {
        match self.entrepot_id {
            None => true,
            Some(own) => own == entrepot_id,
        }
    }
}

/// Authentication errors surfaced by the middleware
#[derive(Debug, Clone)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    InsufficientPermissions,
}

/// Extract token from Authorization header
fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// JWT authentication middleware - requires valid token
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(&auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            if claims.is_expired() {
                return auth_error_response(AuthError::ExpiredToken);
            }

            let user = AuthenticatedUser::from_claims(claims);
            request.extensions_mut().insert(user);

            next.run(request).await
        }
        Err(_) => auth_error_response(AuthError::InvalidToken),
    }
}

/// Create an authentication error response
fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
        AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token has expired"),
        AuthError::InsufficientPermissions => {
            (StatusCode::FORBIDDEN, "Insufficient permissions")
        }
    };

    let body = Json(json!({
        "success": false,
        "error": message
    }));

    (status, body).into_response()
}

/// Admin-only middleware - must be used after auth_middleware
pub async fn admin_middleware(request: Request<Body>, next: Next) -> Response {
    let user = request.extensions().get::<AuthenticatedUser>();

    match user {
        Some(user) if user.is_admin() => next.run(request).await,
        Some(_) => auth_error_response(AuthError::InsufficientPermissions),
        None => auth_error_response(AuthError::MissingToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_mapping_follows_role() {
        let mut user = AuthenticatedUser {
            user_id: "u1".to_string(),
            username: "admin".to_string(),
            role: "admin".to_string(),
            entrepot_id: None,
        };
        assert_eq!(user.actor(), Actor::Admin);

        user.role = "operator".to_string();
        assert_eq!(user.actor(), Actor::Gerant);
    }

    #[test]
    fn warehouse_scope_is_enforced_for_bound_accounts() {
        let entrepot = Uuid::new_v4();
        let user = AuthenticatedUser {
            user_id: "u1".to_string(),
            username: "gerant".to_string(),
            role: "operator".to_string(),
            entrepot_id: Some(entrepot),
        };

        assert!(user.can_access_warehouse(entrepot));
        assert!(!user.can_access_warehouse(Uuid::new_v4()));

        let unrestricted = AuthenticatedUser {
            entrepot_id: None,
            ..user
        };
        assert!(unrestricted.can_access_warehouse(Uuid::new_v4()));
    }
}
