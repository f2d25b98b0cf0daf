//! Process configuration, read from the environment (optionally seeded from a
//! `.env` file by `main`).

use std::{env, fmt::Display, str::FromStr, time::Duration};

use anyhow::anyhow;
use common::rate_limit::RateLimitOptions;

use crate::repositories::customer::CacheOptions;

/// The fixed account accepted by `/login`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_uri: String,
    pub database_name: String,
    pub bind_address: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl: chrono::Duration,
    pub credentials: Credentials,
    pub cache: CacheOptions,
    pub rate_limit: RateLimitOptions,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt_ttl_seconds: i64 = parsed(&lookup, "JWT_TTL_SECONDS", 15 * 60)?;
        if jwt_ttl_seconds <= 0 {
            return Err(anyhow!("JWT_TTL_SECONDS must be positive"));
        }

        let defaults = CacheOptions::default();
        let cache = CacheOptions {
            ttl: Duration::from_secs(parsed(
                &lookup,
                "CACHE_TTL_SECONDS",
                defaults.ttl.as_secs(),
            )?),
            capacity: parsed(&lookup, "CACHE_CAPACITY", defaults.capacity)?,
        };
        if cache.capacity == 0 {
            return Err(anyhow!("CACHE_CAPACITY must be positive"));
        }

        let defaults = RateLimitOptions::default();
        let rate_limit = RateLimitOptions {
            per_day: parsed(&lookup, "RATE_LIMIT_PER_DAY", defaults.per_day)?,
            per_hour: parsed(&lookup, "RATE_LIMIT_PER_HOUR", defaults.per_hour)?,
        };

        Ok(Self {
            database_uri: required(&lookup, "DATABASE_URI")?,
            database_name: lookup("DATABASE_NAME").unwrap_or_else(|| "db".to_string()),
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed(&lookup, "PORT", 5000)?,
            jwt_secret: required(&lookup, "JWT_SECRET")?,
            jwt_ttl: chrono::Duration::seconds(jwt_ttl_seconds),
            credentials: Credentials {
                username: lookup("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
                password: lookup("ADMIN_PASSWORD").unwrap_or_else(|| "password".to_string()),
            },
            cache,
            rate_limit,
        })
    }
}

fn required(lookup: impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<String> {
    lookup(key)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| anyhow!("{} must be set", key))
}

fn parsed<T>(lookup: impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value
            .parse()
            .map_err(|err| anyhow!("Invalid value for {}: {:?} ({})", key, value, err)),
        None => Ok(default),
    }
}
