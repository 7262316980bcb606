//!
//! Warehouse truck-reception tracking service.
//! Reads configuration from TOML file (~/.config/reception-service/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use entrepot_reception::application::services::{ReceptionService, WarehouseService};
use entrepot_reception::config::AppConfig;
use entrepot_reception::domain::{RepositoryProvider, User, UserRole, UserStatus};
use entrepot_reception::infrastructure::crypto::jwt::JwtConfig;
use entrepot_reception::infrastructure::database::migrator::Migrator;
use entrepot_reception::{
    create_api_router, create_event_bus, default_config_path, init_database, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("RECEPTION_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting warehouse reception service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("Prometheus metrics recorder installed");

    // ── Build sub-configs from AppConfig ───────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "reception-service".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // Initialize repository provider
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    // Create default admin user if not exists
    create_default_admin(repos.as_ref(), &app_cfg).await;

    // Initialize event bus for real-time notifications
    let event_bus = create_event_bus();
    info!("Event bus initialized for real-time notifications");

    // Initialize services
    let reception = Arc::new(ReceptionService::new(repos.clone(), event_bus.clone()));
    let warehouses = Arc::new(WarehouseService::new(repos.clone(), event_bus.clone()));

    // Create REST API router
    let api_router = create_api_router(
        repos,
        reception,
        warehouses,
        db.clone(),
        jwt_config,
        event_bus,
        prometheus_handle,
    );

    // Start REST API server with graceful shutdown
    let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let server = axum::serve(listener, api_router).with_graceful_shutdown(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        }
    });

    info!("Server started. Press Ctrl+C to shutdown gracefully.");
    if let Err(e) = server.await {
        error!("REST API server error: {}", e);
    }

    // Perform final cleanup
    info!("Performing final cleanup...");

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Warehouse reception service shutdown complete");
    Ok(())
}

/// Create default admin user if no users exist
async fn create_default_admin(repos: &dyn RepositoryProvider, app_cfg: &AppConfig) {
    use entrepot_reception::infrastructure::crypto::password::hash_password;

    let users_count = repos.users().count().await.unwrap_or(0);

    if users_count == 0 {
        info!("Creating default admin user...");

        let password_hash = match hash_password(&app_cfg.admin.password) {
            Ok(hash) => hash,
            Err(e) => {
                error!("Failed to hash admin password: {}", e);
                return;
            }
        };

        let admin = User {
            id: uuid::Uuid::new_v4(),
            nom: app_cfg.admin.nom.clone(),
            email: app_cfg.admin.email.clone(),
            username: app_cfg.admin.username.clone(),
            password_hash,
            role: UserRole::Admin,
            entrepot_id: None,
            status: UserStatus::Actif,
            created_at: chrono::Utc::now(),
            last_login_at: None,
        };

        match repos.users().save(admin).await {
            Ok(_) => {
                info!("Default admin created: {}", app_cfg.admin.email);
                info!("Please change the admin password immediately!");
            }
            Err(e) => {
                error!("Failed to create admin user: {}", e);
            }
        }
    }
}
