use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use recipe_feed_backend::controllers::{
    category::CategoryController, feed::FeedController, recipe::RecipeController,
    user::UserController,
};
use recipe_feed_backend::domain::feed::{DataProvider, FeedService};
use recipe_feed_backend::infrastructure::config::{Config, LogFormat};
use recipe_feed_backend::infrastructure::db::{check_connection, create_pool};
use recipe_feed_backend::infrastructure::http::{build_router, start_http_server};
use recipe_feed_backend::infrastructure::repositories::RecipeRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting recipe feed backend on {}:{}",
        config.host,
        config.port
    );

    // Create database connection pool
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Database connection pool created");

    // Verify database connection
    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    tracing::info!(
        fetch_timeout = ?config.fetch_timeout,
        mutation_timeout = ?config.mutation_timeout,
        category_cache_enabled = config.category_cache_enabled,
        "Feed settings loaded"
    );

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. The repository is the feed's data provider
    let provider: Arc<dyn DataProvider> =
        Arc::new(RecipeRepository::new(pool.clone(), config.category_cache_enabled));

    // 2. Services
    let feed_service = Arc::new(FeedService::new(provider.clone(), config.feed_timeouts()));

    // 3. Controllers
    let feed_controller = Arc::new(FeedController::new(feed_service.clone()));
    let recipe_controller = Arc::new(RecipeController::new(feed_service.clone()));
    let category_controller = Arc::new(CategoryController::new(feed_service.clone()));
    let user_controller = Arc::new(UserController::new(feed_service));

    let app = build_router(
        config.clone(),
        provider,
        feed_controller,
        recipe_controller,
        category_controller,
        user_controller,
    );

    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "recipe_feed_backend=debug,tower_http=debug".into())
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
