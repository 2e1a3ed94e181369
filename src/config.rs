use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_REPLY_TIMEOUT_MS: u64 = 5000;

#[derive(Clone, Debug)]
pub struct WikiConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub http_port: u16,
    pub queue_capacity: usize,
    pub reply_timeout: Duration,
    pub sql_queries_file: Option<PathBuf>,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://wiki.db".to_string(),
            max_connections: 30,
            http_port: 8080,
            queue_capacity: 256,
            reply_timeout: Duration::from_millis(DEFAULT_REPLY_TIMEOUT_MS),
            sql_queries_file: None,
        }
    }
}

impl WikiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // split out so tests can feed values without touching the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL").unwrap_or(defaults.database_url);
        let max_connections = parse_or(&lookup, "MAX_CONNECTIONS", defaults.max_connections)?;
        let http_port = parse_or(&lookup, "HTTP_PORT", defaults.http_port)?;
        let queue_capacity = parse_or(&lookup, "DB_QUEUE_CAPACITY", defaults.queue_capacity)?;
        let reply_timeout_ms = parse_or(&lookup, "DB_REPLY_TIMEOUT_MS", DEFAULT_REPLY_TIMEOUT_MS)?;
        // a zero wait would fail every request before the service could answer
        if reply_timeout_ms == 0 {
            bail!("Invalid value for DB_REPLY_TIMEOUT_MS: must be greater than 0");
        }
        let sql_queries_file = lookup("SQL_QUERIES_FILE")
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            database_url,
            max_connections,
            http_port,
            queue_capacity,
            reply_timeout: Duration::from_millis(reply_timeout_ms),
            sql_queries_file,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value for {}: {:?}", key, val)),
        None => Ok(default),
    }
}
