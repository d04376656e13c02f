use anyhow::{anyhow, Context, Result};
use goalfeed_core::db::DbPoolConfig;
use goalfeed_core::BackfillOptions;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

#[derive(Clone, Debug)]
pub struct BackfillConfig {
    pub database_url: String,
    /// JSON catalog overriding the built-in league/team tables
    pub catalog_path: Option<PathBuf>,
    pub concurrency: usize,
    pub dry_run: bool,
    pub progress_every: usize,
    pub pool: DbPoolConfig,
}

impl BackfillConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::from_lookup(|key| env::var(key).ok())?;
        config.pool = DbPoolConfig::from_env_with_defaults(DbPoolConfig::batch())?;
        Ok(config)
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

        let concurrency: usize = parse_or(&lookup, "BACKFILL_CONCURRENCY", 4)?;
        if concurrency == 0 {
            return Err(anyhow!("BACKFILL_CONCURRENCY must be at least 1"));
        }

        Ok(Self {
            database_url,
            catalog_path: lookup("TEAM_CATALOG_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            concurrency,
            dry_run: lookup("BACKFILL_DRY_RUN")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            progress_every: parse_or(&lookup, "BACKFILL_PROGRESS_EVERY", 50)?,
            pool: DbPoolConfig::batch(),
        })
    }

    pub fn options(&self) -> BackfillOptions {
        BackfillOptions {
            concurrency: self.concurrency,
            dry_run: self.dry_run,
            progress_every: self.progress_every,
        }
    }

    pub fn log_config(&self) {
        info!("Backfill configuration:");
        info!(
            "  Catalog: {}",
            self.catalog_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string())
        );
        info!("  Concurrency: {}", self.concurrency);
        info!("  Dry run: {}", self.dry_run);
        info!("  Progress every: {} articles", self.progress_every);
        info!(
            "  Pool: max={}, min={}, acquire_timeout={}s",
            self.pool.max_connections,
            self.pool.min_connections,
            self.pool.acquire_timeout.as_secs()
        );
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BackfillConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")])).unwrap();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.progress_every, 50);
        assert!(!config.dry_run);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_database_url_required() {
        assert!(BackfillConfig::from_lookup(lookup(&[])).is_err());
        assert!(BackfillConfig::from_lookup(lookup(&[("DATABASE_URL", " ")])).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = BackfillConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("BACKFILL_CONCURRENCY", "8"),
            ("BACKFILL_DRY_RUN", "TRUE"),
            ("BACKFILL_PROGRESS_EVERY", "0"),
            ("TEAM_CATALOG_PATH", "/etc/goalfeed/catalog.json"),
        ]))
        .unwrap();

        let options = config.options();
        assert_eq!(options.concurrency, 8);
        assert!(options.dry_run);
        assert_eq!(options.progress_every, 0);
        assert_eq!(
            config.catalog_path,
            Some(PathBuf::from("/etc/goalfeed/catalog.json"))
        );
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(BackfillConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("BACKFILL_CONCURRENCY", "many"),
        ]))
        .is_err());
        assert!(BackfillConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("BACKFILL_CONCURRENCY", "0"),
        ]))
        .is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("nope"));
    }
}
