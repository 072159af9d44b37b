use recipe_feed_backend::controllers::{
    category::CategoryController, feed::FeedController, recipe::RecipeController,
    user::UserController,
};
use recipe_feed_backend::domain::feed::{DataProvider, FeedService};
use recipe_feed_backend::infrastructure::config::{Config, Environment, LogFormat};
use recipe_feed_backend::infrastructure::http::build_router;
use std::sync::Arc;
use std::time::Duration;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use uuid::Uuid;

pub mod assertions;
pub mod in_memory_provider;

use api_client::TestClient;
use fixtures::TestFixtures;
use in_memory_provider::InMemoryProvider;

const TEST_JWT_SECRET: &str = "test-jwt-secret-key-for-testing-only";

pub struct TestContext {
    pub client: TestClient,
    pub config: Config,
    pub provider: Arc<InMemoryProvider>,
    pub fixtures: TestFixtures,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let config = Config {
                database_url: "postgres://unused".to_string(),
                database_max_connections: 1,
                host: "127.0.0.1".to_string(),
                port: 0, // Will be assigned by the OS
                jwt_secret: TEST_JWT_SECRET.to_string(),
                environment: Environment::Development,
                log_format: LogFormat::Pretty,
                fetch_timeout: Duration::from_secs(2),
                mutation_timeout: Duration::from_secs(2),
                category_cache_enabled: false,
            };

            let provider = Arc::new(InMemoryProvider::new());
            let fixtures = TestFixtures::seed(&provider);

            let shared = Arc::new(config.clone());
            let data_provider: Arc<dyn DataProvider> = provider.clone();
            let feed_service = Arc::new(FeedService::new(
                data_provider.clone(),
                shared.feed_timeouts(),
            ));

            let app = build_router(
                shared,
                data_provider,
                Arc::new(FeedController::new(feed_service.clone())),
                Arc::new(RecipeController::new(feed_service.clone())),
                Arc::new(CategoryController::new(feed_service.clone())),
                Arc::new(UserController::new(feed_service)),
            );

            // Start server
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind listener");
            let addr = listener.local_addr().expect("Failed to get local addr");
            let base_url = format!("http://{}", addr);

            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            Self {
                client: TestClient::new(&base_url),
                config,
                provider,
                fixtures,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Server task ends with the test runtime
        }
    }
}

// Helper to generate valid JWT tokens for testing
pub fn generate_test_jwt(user_id: &Uuid, secret: &str) -> String {
    generate_test_jwt_expiring(user_id, secret, chrono::Duration::hours(1))
}

pub fn generate_test_jwt_expiring(
    user_id: &Uuid,
    secret: &str,
    expires_in: chrono::Duration,
) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: i64,
        iat: i64,
    }

    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + expires_in).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
