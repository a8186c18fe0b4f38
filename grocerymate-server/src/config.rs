//! Server configuration from environment variables.

use anyhow::{Context, Result};
use grocerymate_ai::RetryPolicy;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_host: String,
    pub port: u16,
    /// HS256 secret shared with the service that issues tokens.
    pub jwt_secret: String,
    /// Attempts per upstream model before giving up.
    pub ai_max_retries: u32,
    pub ai_retry_base_delay_ms: u64,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        Ok(Self {
            bind_host: std::env::var("BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("Invalid PORT")?,
            jwt_secret,
            ai_max_retries: std::env::var("AI_MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("Invalid AI_MAX_RETRIES")?,
            ai_retry_base_delay_ms: std::env::var("AI_RETRY_BASE_DELAY_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .context("Invalid AI_RETRY_BASE_DELAY_MS")?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.ai_max_retries,
            Duration::from_millis(self.ai_retry_base_delay_ms),
        )
    }
}
