use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub database: DatabaseConfig,
    pub remote: RemoteConfig,
    pub sync: SyncPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

/// Retry policy for the sync pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncPolicy {
    /// Attempt an immediate pass after a write when the monitor reports online.
    pub opportunistic: bool,
    /// Transient failures beyond this count park the record for manual review.
    pub max_attempts: u32,
    pub base_backoff_secs: u64,
    pub max_backoff_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite:data/aerosync.db".to_string(),
                max_connections: 5,
            },
            remote: RemoteConfig {
                base_url: "http://localhost:8080".to_string(),
                request_timeout_secs: 30,
            },
            sync: SyncPolicy::default(),
        }
    }
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            opportunistic: true,
            max_attempts: 5,
            base_backoff_secs: 30,
            max_backoff_secs: 3600, // 1 hour
        }
    }
}

impl SyncPolicy {
    /// Delay before the next attempt, doubling per recorded attempt and
    /// capped at `max_backoff_secs`.
    pub fn backoff_after(&self, attempts: u32) -> chrono::Duration {
        let exponent = attempts.saturating_sub(1).min(32);
        let secs = self
            .base_backoff_secs
            .saturating_mul(1u64 << exponent)
            .min(self.max_backoff_secs);
        chrono::Duration::seconds(secs as i64)
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("AEROSYNC_DATABASE_URL") {
            if !v.trim().is_empty() {
                cfg.database.url = v;
            }
        }
        if let Ok(v) = std::env::var("AEROSYNC_REMOTE_URL") {
            if !v.trim().is_empty() {
                cfg.remote.base_url = v;
            }
        }
        if let Ok(v) = std::env::var("AEROSYNC_REQUEST_TIMEOUT_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.remote.request_timeout_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("AEROSYNC_OPPORTUNISTIC_SYNC") {
            cfg.sync.opportunistic = parse_bool(&v, cfg.sync.opportunistic);
        }
        if let Ok(v) = std::env::var("AEROSYNC_MAX_ATTEMPTS") {
            if let Some(value) = parse_u32(&v) {
                cfg.sync.max_attempts = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("AEROSYNC_BASE_BACKOFF_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.base_backoff_secs = value;
            }
        }
        if let Ok(v) = std::env::var("AEROSYNC_MAX_BACKOFF_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.max_backoff_secs = value;
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.trim().is_empty() {
            return Err("Database url must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.remote.base_url.trim().is_empty() {
            return Err("Remote base_url must not be empty".to_string());
        }
        if self.sync.max_attempts == 0 {
            return Err("Sync max_attempts must be greater than 0".to_string());
        }
        if self.sync.base_backoff_secs > self.sync.max_backoff_secs {
            return Err("Sync base_backoff_secs must not exceed max_backoff_secs".to_string());
        }
        Ok(())
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_max_attempts_is_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.sync.max_attempts = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_backoff_bounds_are_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.sync.base_backoff_secs = 7200;
        cfg.sync.max_backoff_secs = 60;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = SyncPolicy {
            opportunistic: true,
            max_attempts: 5,
            base_backoff_secs: 30,
            max_backoff_secs: 100,
        };
        assert_eq!(policy.backoff_after(1).num_seconds(), 30);
        assert_eq!(policy.backoff_after(2).num_seconds(), 60);
        assert_eq!(policy.backoff_after(3).num_seconds(), 100);
        assert_eq!(policy.backoff_after(40).num_seconds(), 100);
    }
}
