use std::str::FromStr;
use std::time::Duration;

use adforge_pipeline::PollPolicy;
use axum::http::HeaderValue;

/// A configuration variable that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("{name} must be {expected} (got '{value}')")]
pub struct ConfigError {
    pub name: &'static str,
    pub expected: &'static str,
    pub value: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for in-flight requests to drain on shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// PostgreSQL URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Endpoint of the external generation service.
    pub generation_webhook_url: Option<String>,
    pub generation_webhook_timeout_secs: u64,
    pub completion_poll_initial_ms: u64,
    pub completion_poll_max_ms: u64,
    /// Upper bound for `GET /products/{id}/status/wait`.
    pub completion_wait_max_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                           | Default                 |
    /// |-----------------------------------|-------------------------|
    /// | `HOST`                            | `0.0.0.0`               |
    /// | `PORT`                            | `3000`                  |
    /// | `CORS_ORIGINS`                    | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`            | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`           | `30`                    |
    /// | `DATABASE_URL`                    | unset (in-memory)       |
    /// | `GENERATION_WEBHOOK_URL`          | unset                   |
    /// | `GENERATION_WEBHOOK_TIMEOUT_SECS` | `10`                    |
    /// | `COMPLETION_POLL_INITIAL_MS`      | `500`                   |
    /// | `COMPLETION_POLL_MAX_MS`          | `5000`                  |
    /// | `COMPLETION_WAIT_MAX_SECS`        | `120`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
        let optional = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(bad) = cors_origins
            .iter()
            .find(|o| o.parse::<HeaderValue>().is_err())
        {
            return Err(ConfigError {
                name: "CORS_ORIGINS",
                expected: "a comma-separated list of origins",
                value: bad.clone(),
            });
        }

        let config = Self {
            host: var("HOST", "0.0.0.0"),
            port: parse("PORT", &var("PORT", "3000"), "a valid u16")?,
            cors_origins,
            request_timeout_secs: parse(
                "REQUEST_TIMEOUT_SECS",
                &var("REQUEST_TIMEOUT_SECS", "30"),
                "a valid u64",
            )?,
            shutdown_timeout_secs: parse(
                "SHUTDOWN_TIMEOUT_SECS",
                &var("SHUTDOWN_TIMEOUT_SECS", "30"),
                "a valid u64",
            )?,
            database_url: optional("DATABASE_URL"),
            generation_webhook_url: optional("GENERATION_WEBHOOK_URL"),
            generation_webhook_timeout_secs: parse(
                "GENERATION_WEBHOOK_TIMEOUT_SECS",
                &var("GENERATION_WEBHOOK_TIMEOUT_SECS", "10"),
                "a valid u64",
            )?,
            completion_poll_initial_ms: parse_positive(
                "COMPLETION_POLL_INITIAL_MS",
                &var("COMPLETION_POLL_INITIAL_MS", "500"),
            )?,
            completion_poll_max_ms: parse_positive(
                "COMPLETION_POLL_MAX_MS",
                &var("COMPLETION_POLL_MAX_MS", "5000"),
            )?,
            completion_wait_max_secs: parse(
                "COMPLETION_WAIT_MAX_SECS",
                &var("COMPLETION_WAIT_MAX_SECS", "120"),
                "a valid u64",
            )?,
        };

        if config.completion_poll_max_ms < config.completion_poll_initial_ms {
            return Err(ConfigError {
                name: "COMPLETION_POLL_MAX_MS",
                expected: "at least COMPLETION_POLL_INITIAL_MS",
                value: config.completion_poll_max_ms.to_string(),
            });
        }
        // A timed-out request must not cut the webhook call short.
        if config.request_timeout_secs <= config.generation_webhook_timeout_secs {
            return Err(ConfigError {
                name: "REQUEST_TIMEOUT_SECS",
                expected: "greater than GENERATION_WEBHOOK_TIMEOUT_SECS",
                value: config.request_timeout_secs.to_string(),
            });
        }
        Ok(config)
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_webhook_timeout_secs)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            initial_delay: Duration::from_millis(self.completion_poll_initial_ms),
            max_delay: Duration::from_millis(self.completion_poll_max_ms),
            timeout: Duration::from_secs(self.completion_wait_max_secs),
        }
    }
}

fn parse<T: FromStr>(
    name: &'static str,
    value: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError {
        name,
        expected,
        value: value.to_string(),
    })
}

fn parse_positive(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    match parse::<u64>(name, value, "a positive integer")? {
        0 => Err(ConfigError {
            name,
            expected: "a positive integer",
            value: value.to_string(),
        }),
        n => Ok(n),
    }
}
