use actix_web::{App, HttpServer, middleware::Logger};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invoice_actions::{
  adapters::http::{
    InvoiceRouteDependencies, RequestIdMiddleware, TemplateEngine, configure_health_routes,
    configure_invoice_routes,
  },
  application::invoice::{ListInvoicesUseCase, ValidatedMutationHandler},
  domain::invoice::{InvoiceService, PageCache},
  infrastructure::{
    cache::{InMemoryPageCache, RedisPageCache},
    config::{Config, RedisConfig},
    persistence::postgres::PostgresInvoiceRepository,
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "invoice_actions=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting invoice actions service");

  // Load configuration
  let config = Config::load().map_err(|e| {
    tracing::error!("Failed to load configuration: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;
  tracing::info!("Configuration loaded successfully");

  // Set up database connection pool with timeout
  tracing::info!("Connecting to database");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  // Run database migrations
  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to run database migrations: {}", e);
      std::io::Error::other(format!("Migration error: {}", e))
    })?;
  tracing::info!("Database migrations completed");

  // Page cache: Redis when configured, otherwise process-local
  let page_ttl_seconds = config.cache.page_ttl_seconds;
  let page_cache: Arc<dyn PageCache> = match &config.redis {
    Some(redis_config) => Arc::new(connect_redis_page_cache(redis_config, page_ttl_seconds).await?),
    None => {
      tracing::info!("Redis not configured, using in-memory page cache");
      Arc::new(InMemoryPageCache::new(Duration::from_secs(
        page_ttl_seconds,
      )))
    }
  };

  // Initialize repositories and services
  let invoice_repo = Arc::new(PostgresInvoiceRepository::new(db_pool.clone()));
  let invoice_service = Arc::new(InvoiceService::new(invoice_repo));

  let mutation_handler = Arc::new(
    ValidatedMutationHandler::new(invoice_service.clone(), page_cache.clone())
      .with_update_failure_policy(config.mutations.update_failure),
  );
  let list_invoices_use_case = Arc::new(ListInvoicesUseCase::new(invoice_service));
  tracing::info!(
    update_failure = ?config.mutations.update_failure,
    "Mutation handler initialized"
  );

  // Initialize template engine
  let templates = TemplateEngine::new(&config.templates.glob).map_err(|e| {
    tracing::error!("Failed to initialize template engine: {}", e);
    std::io::Error::other(format!("Template error: {}", e))
  })?;
  tracing::info!("Template engine initialized");

  let deps = InvoiceRouteDependencies {
    templates,
    page_cache,
    mutation_handler,
    list_invoices_use_case,
  };

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  // Create and start the HTTP server
  HttpServer::new(move || {
    App::new()
      // Add request ID middleware
      .wrap(RequestIdMiddleware::new())
      // Add logging middleware
      .wrap(Logger::default())
      .configure(configure_health_routes)
      .configure(|cfg| configure_invoice_routes(cfg, deps.clone()))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}

async fn connect_redis_page_cache(
  config: &RedisConfig,
  page_ttl_seconds: u64,
) -> std::io::Result<RedisPageCache> {
  tracing::info!("Connecting to Redis");

  let redis_client = redis::Client::open(config.url.clone()).map_err(|e| {
    tracing::error!("Failed to create Redis client: {}", e);
    std::io::Error::new(
      std::io::ErrorKind::InvalidInput,
      format!("Invalid Redis URL: {}", e),
    )
  })?;

  let redis_conn = tokio::time::timeout(
    Duration::from_secs(config.connect_timeout_seconds),
    redis_client.get_connection_manager(),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Redis connection timed out after {} seconds. Is Redis running?",
      config.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Redis connection timed out after {} seconds",
        config.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to Redis: {}", e);
    std::io::Error::new(
      std::io::ErrorKind::ConnectionRefused,
      format!("Could not connect to Redis: {}", e),
    )
  })?;

  tracing::info!("Redis connection established");
  Ok(RedisPageCache::new(redis_conn, page_ttl_seconds))
}
