use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domain::feed::DataProvider;
use crate::infrastructure::config::Config;
use crate::{
    controllers::{
        category::CategoryController, feed::FeedController, health, recipe::RecipeController,
        user::UserController,
    },
    infrastructure::auth::{request_id_middleware, session_middleware},
};

/// Build the application router with all routes configured
pub fn build_router(
    config: Arc<Config>,
    provider: Arc<dyn DataProvider>,
    feed_controller: Arc<FeedController>,
    recipe_controller: Arc<RecipeController>,
    category_controller: Arc<CategoryController>,
    user_controller: Arc<UserController>,
) -> Router {
    // Feed routes (anonymous viewers allowed)
    let feed_routes = Router::new()
        .route("/api/recipes", get(FeedController::get_feed))
        .route("/api/users/:userId/recipes", get(FeedController::get_user_feed))
        .with_state(feed_controller);

    // Recipe routes (mutations check the session themselves)
    let recipe_routes = Router::new()
        .route(
            "/api/recipes/:recipeId",
            get(RecipeController::get_recipe).delete(RecipeController::delete_recipe),
        )
        .route(
            "/api/recipes/:recipeId/like",
            post(RecipeController::like_recipe).delete(RecipeController::unlike_recipe),
        )
        .with_state(recipe_controller);

    let user_routes = Router::new()
        .route(
            "/api/users/:userId/follow",
            post(UserController::follow_user).delete(UserController::unfollow_user),
        )
        .route(
            "/api/users/:userId/followers",
            get(UserController::list_followers),
        )
        .with_state(user_controller);

    let category_routes = Router::new()
        .route("/api/categories", get(CategoryController::list_categories))
        .with_state(category_controller);

    let api_routes = Router::new()
        .merge(feed_routes)
        .merge(recipe_routes)
        .merge(category_routes)
        .merge(user_routes)
        .layer(middleware::from_fn_with_state(config.clone(), session_middleware));

    let app = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(provider)
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware)),
        );

    if config.is_development() {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Start the HTTP server on the configured address
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
