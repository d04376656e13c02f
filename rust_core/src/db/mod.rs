//! Database connection pooling and article tag storage.
//!
//! This module provides:
//! - Pool creation with env-overridable settings
//! - Schema setup for the `article_teams` tag table
//! - A Postgres-backed `ArticleStore` for the backfill job
//! - Retry with exponential backoff for transient failures

pub mod article_tags;
pub mod retry;

use anyhow::{bail, Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;
use std::time::Duration;

pub use article_tags::{ensure_schema, PgArticleStore};

/// Database pool configuration
#[derive(Debug, Clone)]
pub struct DbPoolConfig {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Timeout for acquiring a connection
    pub acquire_timeout: Duration,
    /// How long idle connections are kept alive
    pub idle_timeout: Duration,
    /// Maximum lifetime of a connection
    pub max_lifetime: Duration,
}

impl Default for DbPoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(300),   // 5 minutes
            max_lifetime: Duration::from_secs(1800),  // 30 minutes
        }
    }
}

impl DbPoolConfig {
    /// Configuration for one-shot batch jobs (backfill)
    pub fn batch() -> Self {
        Self {
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            ..Default::default()
        }
    }

    /// Create config from environment variables with fallback to provided defaults.
    /// Unset variables keep the default; unparsable ones are an error.
    pub fn from_env_with_defaults(defaults: Self) -> Result<Self> {
        Self::from_lookup(defaults, |key| env::var(key).ok())
    }

    fn from_lookup<F>(defaults: Self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secs = |key: &str, default: Duration| -> Result<Duration> {
            Ok(parse_var::<u64, _>(&lookup, key)?
                .map(Duration::from_secs)
                .unwrap_or(default))
        };

        let config = Self {
            max_connections: parse_var(&lookup, "DB_POOL_MAX_CONNECTIONS")?
                .unwrap_or(defaults.max_connections),
            min_connections: parse_var(&lookup, "DB_POOL_MIN_CONNECTIONS")?
                .unwrap_or(defaults.min_connections),
            acquire_timeout: secs("DB_POOL_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout)?,
            idle_timeout: secs("DB_POOL_IDLE_TIMEOUT_SECS", defaults.idle_timeout)?,
            max_lifetime: secs("DB_POOL_MAX_LIFETIME_SECS", defaults.max_lifetime)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            bail!("DB_POOL_MAX_CONNECTIONS must be at least 1");
        }
        if self.min_connections > self.max_connections {
            bail!(
                "DB_POOL_MIN_CONNECTIONS ({}) exceeds DB_POOL_MAX_CONNECTIONS ({})",
                self.min_connections,
                self.max_connections
            );
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .with_context(|| format!("Invalid value for {}: {:?}", key, raw))
        })
        .transpose()
}

/// Create a database connection pool with the given configuration.
///
/// # Example
/// ```ignore
/// let config = DbPoolConfig::from_env_with_defaults(DbPoolConfig::batch())?;
/// let pool = create_pool(&database_url, &config).await?;
/// ```
pub async fn create_pool(database_url: &str, config: &DbPoolConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(database_url)
        .await
        .context("Failed to create database connection pool")?;

    tracing::info!(
        "Database pool created: max={}, min={}, acquire_timeout={}s",
        config.max_connections,
        config.min_connections,
        config.acquire_timeout.as_secs()
    );

    Ok(pool)
}
