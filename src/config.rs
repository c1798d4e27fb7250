use std::time::Duration;

/// Runtime configuration, read from the environment.
///
/// Every knob has a default suitable for local development; production
/// deployments override through `SHOWROOM_*` variables.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub max_upload_bytes: usize,
    pub task_soft_timeout: Duration,
    pub task_hard_timeout: Duration,
    pub promotion_retention_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://showroom.db?mode=rwc".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            task_soft_timeout: Duration::from_secs(25 * 60),
            task_hard_timeout: Duration::from_secs(30 * 60),
            promotion_retention_days: 90,
        }
    }
}

impl Config {
    /// Build a config from the process environment, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: env_string("SHOWROOM_DATABASE_URL").unwrap_or(defaults.database_url),
            max_upload_bytes: env_parse("SHOWROOM_MAX_UPLOAD_BYTES")
                .unwrap_or(defaults.max_upload_bytes),
            task_soft_timeout: env_parse("SHOWROOM_TASK_SOFT_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.task_soft_timeout),
            task_hard_timeout: env_parse("SHOWROOM_TASK_HARD_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.task_hard_timeout),
            promotion_retention_days: env_parse("SHOWROOM_PROMOTION_RETENTION_DAYS")
                .unwrap_or(defaults.promotion_retention_days),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.task_soft_timeout < config.task_hard_timeout);
    }
}
