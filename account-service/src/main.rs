use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use account_service::config::Config;
use account_service::db::{create_pool, run_migrations};
use account_service::routes::configure_routes;
use account_service::services::{AccountService, SessionService};
use media_store::MediaStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");

    tracing::info!("Starting account-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Create database connection pool
    let db_pool = create_pool(&config.database.url, config.database.max_connections)
        .await
        .expect("Failed to create database pool");

    tracing::info!(
        "Database pool created with {} max connections",
        config.database.max_connections
    );

    // Run migrations in non-production unless explicitly skipped
    let run_migrations_env = std::env::var("RUN_MIGRATIONS").unwrap_or_else(|_| "true".into());
    if !config.is_production() && run_migrations_env != "false" {
        tracing::info!("Running database migrations...");
        run_migrations(&db_pool)
            .await
            .expect("Failed to run database migrations");
        tracing::info!("Database migrations completed");
    }

    // Media store client, constructed once and shared
    let media_config = Config::media_from_env().expect("Failed to load media store configuration");
    let media = MediaStore::new(media_config)
        .await
        .expect("Failed to initialize media store");
    tracing::info!("Media store initialized");

    // Service layer
    let sessions = SessionService::new(db_pool.clone(), config.jwt.clone());
    let accounts = AccountService::new(db_pool.clone(), media, sessions);

    let bind_addr = (config.app.host.clone(), config.app.port);
    tracing::info!("Listening on {}:{}", config.app.host, config.app.port);

    let app_config = config;
    HttpServer::new(move || {
        let cors = if app_config.is_development() {
            Cors::permissive()
        } else {
            Cors::default()
        };

        let jwt = app_config.jwt.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(app_config.clone()))
            .app_data(web::Data::new(accounts.clone()))
            .configure(|cfg| configure_routes(cfg, &jwt))
    })
    .bind(bind_addr)?
    .run()
    .await
}
