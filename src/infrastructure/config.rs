use anyhow::{Context, Result};
use std::env;
use tracing::warn;

const DEV_JWT_SECRET: &str = "shelfmark-dev-secret-change-me";
pub const MAX_SESSION_TTL_SECS: u64 = 365 * 24 * 3600;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub session_ttl_secs: u64,
    pub allowed_origin: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            session_ttl_secs: 24 * 3600,
            allowed_origin: None,
        }
    }
}

impl AppConfig {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("SHELFMARK_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("SHELFMARK_PORT is not a port number: {raw}"))?,
            None => defaults.port,
        };

        let session_ttl_secs = match lookup("SHELFMARK_SESSION_TTL_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("SHELFMARK_SESSION_TTL_SECS is not a number: {raw}"))?,
            None => defaults.session_ttl_secs,
        };
        if session_ttl_secs == 0 {
            anyhow::bail!("SHELFMARK_SESSION_TTL_SECS must be greater than zero");
        }
        if session_ttl_secs > MAX_SESSION_TTL_SECS {
            anyhow::bail!(
                "SHELFMARK_SESSION_TTL_SECS must be at most {MAX_SESSION_TTL_SECS}, got {session_ttl_secs}"
            );
        }

        let jwt_secret = match lookup("SHELFMARK_JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("SHELFMARK_JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
        };

        Ok(Self {
            host: lookup("SHELFMARK_HOST").unwrap_or(defaults.host),
            port,
            jwt_secret,
            session_ttl_secs,
            allowed_origin: lookup("SHELFMARK_ALLOWED_ORIGIN").filter(|o| !o.is_empty()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert!(config.allowed_origin.is_none());
    }

    #[test]
    fn test_reads_all_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("SHELFMARK_HOST", "0.0.0.0"),
            ("SHELFMARK_PORT", "9000"),
            ("SHELFMARK_JWT_SECRET", "s3cret"),
            ("SHELFMARK_SESSION_TTL_SECS", "60"),
            ("SHELFMARK_ALLOWED_ORIGIN", "http://localhost:3000"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.session_ttl_secs, 60);
        assert_eq!(config.allowed_origin.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn test_invalid_port_fails() {
        let err = AppConfig::from_lookup(lookup_from(&[("SHELFMARK_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("SHELFMARK_PORT"));
    }

    #[test]
    fn test_zero_ttl_fails() {
        assert!(AppConfig::from_lookup(lookup_from(&[("SHELFMARK_SESSION_TTL_SECS", "0")])).is_err());
    }

    #[test]
    fn test_ttl_above_one_year_fails() {
        let too_long = (MAX_SESSION_TTL_SECS + 1).to_string();
        let err = AppConfig::from_lookup(lookup_from(&[("SHELFMARK_SESSION_TTL_SECS", too_long.as_str())]))
            .unwrap_err();
        assert!(err.to_string().contains("at most"));

        let max = u64::MAX.to_string();
        assert!(AppConfig::from_lookup(lookup_from(&[("SHELFMARK_SESSION_TTL_SECS", max.as_str())])).is_err());

        let year = MAX_SESSION_TTL_SECS.to_string();
        let config =
            AppConfig::from_lookup(lookup_from(&[("SHELFMARK_SESSION_TTL_SECS", year.as_str())])).unwrap();
        assert_eq!(config.session_ttl_secs, MAX_SESSION_TTL_SECS);
    }
}
