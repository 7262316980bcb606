//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::services::{ReceptionService, WarehouseService};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::interfaces::http::middleware::{admin_middleware, auth_middleware, AuthState};
use crate::interfaces::http::modules::{auth, health, metrics, trucks, users, warehouses};
use crate::interfaces::ws::{create_notification_state, ws_notifications_handler};
use crate::notifications::SharedEventBus;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Auth
        auth::handlers::login,
        auth::handlers::get_current_user,
        auth::handlers::change_password,
        // Warehouses
        warehouses::handlers::list_warehouses,
        warehouses::handlers::create_warehouse,
        warehouses::handlers::get_warehouse,
        warehouses::handlers::update_warehouse,
        warehouses::handlers::delete_warehouse,
        warehouses::handlers::warehouse_stats,
        warehouses::handlers::list_warehouse_trucks,
        warehouses::handlers::register_truck,
        // Trucks
        trucks::handlers::list_trucks,
        trucks::handlers::get_truck,
        trucks::handlers::submit_analysis,
        trucks::handlers::validate_truck,
        trucks::handlers::refuse_truck,
        trucks::handlers::resend_truck,
        trucks::handlers::reintegrate_truck,
        trucks::handlers::accept_truck,
        trucks::handlers::discharge_truck,
        trucks::handlers::mark_seen,
        // Users
        users::handlers::list_users,
        users::handlers::get_user,
        users::handlers::create_user,
        users::handlers::update_user,
        users::handlers::delete_user,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<trucks::TruckDto>,
            PaginationParams,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            auth::ChangePasswordRequest,
            // Warehouses
            warehouses::WarehouseDto,
            warehouses::CreateWarehouseRequest,
            warehouses::UpdateWarehouseRequest,
            warehouses::WarehouseStatsDto,
            // Trucks
            trucks::TruckDto,
            trucks::HistoryEntryDto,
            trucks::TruckProductsDto,
            trucks::RegisterTruckRequest,
            trucks::SubmitAnalysisRequest,
            trucks::RefuseTruckRequest,
            trucks::AcceptTruckRequest,
            // Users
            users::UserDto,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "User authentication: login (JWT), profile, password change"),
        (name = "Warehouses", description = "Warehouse CRUD, dashboard stats and truck registration"),
        (name = "Trucks", description = "Truck history views and reception workflow actions"),
        (name = "Users", description = "Staff account management (admin only)"),
        (name = "WebSocket Notifications", description = "Real-time event notifications via WebSocket"),
    ),
    info(
        title = "Warehouse Reception API",
        version = "1.0.0",
        description = "REST API for tracking trucks through the warehouse reception workflow",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
#[allow(clippy::too_many_arguments)]
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    reception: Arc<ReceptionService>,
    warehouse_service: Arc<WarehouseService>,
    db: DatabaseConnection,
    jwt_config: JwtConfig,
    event_bus: SharedEventBus,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let auth_state = AuthState {
        jwt_config: jwt_config.clone(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (login is public, the rest sits behind the middleware)
    let auth_handler_state = auth::AuthHandlerState {
        repos: repos.clone(),
        jwt_config,
    };
    let auth_public_routes = Router::new()
        .route("/login", post(auth::handlers::login))
        .with_state(auth_handler_state.clone());
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::handlers::get_current_user))
        .route("/change-password", put(auth::handlers::change_password))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_handler_state);

    // Warehouse routes (protected)
    let warehouse_state = warehouses::WarehouseHandlerState {
        warehouses: warehouse_service,
        reception: reception.clone(),
    };
    let warehouse_routes = Router::new()
        .route(
            "/",
            get(warehouses::handlers::list_warehouses).post(warehouses::handlers::create_warehouse),
        )
        .route(
            "/{id}",
            get(warehouses::handlers::get_warehouse)
                .put(warehouses::handlers::update_warehouse)
                .delete(warehouses::handlers::delete_warehouse),
        )
        .route("/{id}/stats", get(warehouses::handlers::warehouse_stats))
        .route(
            "/{id}/trucks",
            get(warehouses::handlers::list_warehouse_trucks)
                .post(warehouses::handlers::register_truck),
        )
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(warehouse_state);

    // Truck routes (protected)
    let truck_state = trucks::TruckHandlerState { reception };
    let truck_routes = Router::new()
        .route("/", get(trucks::handlers::list_trucks))
        .route("/{id}", get(trucks::handlers::get_truck))
        .route("/{id}/analysis", post(trucks::handlers::submit_analysis))
        .route("/{id}/validate", post(trucks::handlers::validate_truck))
        .route("/{id}/refuse", post(trucks::handlers::refuse_truck))
        .route("/{id}/resend", post(trucks::handlers::resend_truck))
        .route(
            "/{id}/reintegrate",
            post(trucks::handlers::reintegrate_truck),
        )
        .route("/{id}/accept", post(trucks::handlers::accept_truck))
        .route("/{id}/discharge", post(trucks::handlers::discharge_truck))
        .route("/{id}/seen", post(trucks::handlers::mark_seen))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(truck_state);

    // User routes (admin only)
    let user_state = users::UserHandlerState { repos };
    let user_routes = Router::new()
        .route(
            "/",
            get(users::handlers::list_users).post(users::handlers::create_user),
        )
        .route(
            "/{id}",
            get(users::handlers::get_user)
                .put(users::handlers::update_user)
                .delete(users::handlers::delete_user),
        )
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(user_state);

    // Health (public)
    let health_state = health::HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };
    let health_routes = Router::new()
        .route("/health", get(health::handlers::health_check))
        .with_state(health_state);

    // Metrics (public scrape endpoint)
    let metrics_state = metrics::MetricsState {
        handle: prometheus_handle,
    };
    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics_state);

    // Notification WebSocket routes (no auth for WebSocket upgrade)
    let notification_state = create_notification_state(event_bus);
    let notification_routes = Router::new()
        .route("/ws", get(ws_notifications_handler))
        .with_state(notification_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health + metrics
        .merge(health_routes)
        .merge(metrics_routes)
        // Auth
        .nest("/api/v1/auth", auth_public_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Warehouses
        .nest("/api/v1/warehouses", warehouse_routes)
        // Trucks
        .nest("/api/v1/trucks", truck_routes)
        // Users
        .nest("/api/v1/users", user_routes)
        // Notifications WebSocket
        .nest("/api/v1/notifications", notification_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
