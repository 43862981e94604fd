use grit_core::scoring::{ScoringConfig, DEFAULT_CHALLENGE_RATE, DEFAULT_MIN_TRAINING_DAYS};

use crate::auth::jwt::JwtConfig;

/// Runtime settings for the HTTP server, read once at startup.
///
/// Every field has a default that works for local development; production
/// deployments override through the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Allowed CORS origins, from the comma-separated `CORS_ORIGINS` variable.
    pub cors_origins: Vec<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background jobs to stop, in seconds.
    pub shutdown_timeout_secs: u64,
    /// Token signing secret and lifetime.
    pub jwt: JwtConfig,
    /// Scoring thresholds shared by the whole points engine.
    pub scoring: ScoringConfig,
}

impl ServerConfig {
    /// Read the server settings from the environment.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `MIN_TRAINING_DAYS`     | `3`                        |
    /// | `CHALLENGE_DEFAULT_RATE`| `5`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();
        let scoring = scoring_from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            scoring,
        }
    }
}

/// Load the engine's scoring thresholds from environment variables.
fn scoring_from_env() -> ScoringConfig {
    let min_training_days: i32 = std::env::var("MIN_TRAINING_DAYS")
        .unwrap_or_else(|_| DEFAULT_MIN_TRAINING_DAYS.to_string())
        .parse()
        .expect("MIN_TRAINING_DAYS must be a valid i32");
    assert!(
        min_training_days > 0,
        "MIN_TRAINING_DAYS must be greater than zero"
    );

    let default_challenge_rate: i32 = std::env::var("CHALLENGE_DEFAULT_RATE")
        .unwrap_or_else(|_| DEFAULT_CHALLENGE_RATE.to_string())
        .parse()
        .expect("CHALLENGE_DEFAULT_RATE must be a valid i32");

    ScoringConfig {
        min_training_days,
        default_challenge_rate,
    }
}
