use crate::domain::feed::FeedTimeouts;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Feed
    pub fetch_timeout: Duration,
    pub mutation_timeout: Duration,
    pub category_cache_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            jwt_secret: env::var("JWT_SECRET")?,
            environment: parse_environment(env::var("ENVIRONMENT").ok().as_deref()),
            log_format: parse_log_format(env::var("LOG_FORMAT").ok().as_deref()),
            fetch_timeout: parse_millis(env::var("FEED_FETCH_TIMEOUT_MS").ok().as_deref(), 5_000)?,
            mutation_timeout: parse_millis(
                env::var("FEED_MUTATION_TIMEOUT_MS").ok().as_deref(),
                10_000,
            )?,
            category_cache_enabled: env::var("CATEGORY_CACHE_ENABLED")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn feed_timeouts(&self) -> FeedTimeouts {
        FeedTimeouts {
            fetch: self.fetch_timeout,
            mutation: self.mutation_timeout,
        }
    }
}

fn parse_environment(raw: Option<&str>) -> Environment {
    match raw {
        Some("production") => Environment::Production,
        _ => Environment::Development,
    }
}

fn parse_log_format(raw: Option<&str>) -> LogFormat {
    match raw {
        Some("json") => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}

fn parse_millis(raw: Option<&str>, default_ms: u64) -> Result<Duration, std::num::ParseIntError> {
    let millis = match raw {
        Some(value) => value.trim().parse()?,
        None => default_ms,
    };
    Ok(Duration::from_millis(millis))
}
