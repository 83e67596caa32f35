//! Config validation: values that parse but cannot work.

use crate::config::Config;
use crate::error::ConfigError;

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.port == 0 {
        return Err(ConfigError::Invalid {
            var: "PORT",
            value: "0".into(),
            reason: "port must be between 1 and 65535",
        });
    }
    let db = &config.database;
    if !(db.url.starts_with("postgres://") || db.url.starts_with("postgresql://")) {
        return Err(ConfigError::Invalid {
            var: "DATABASE_URL",
            value: crate::config::redact_url(&db.url),
            reason: "expected a postgres:// or postgresql:// URL",
        });
    }
    for (var, ms) in [
        ("DB_CONNECT_TIMEOUT_MS", db.connect_timeout.as_millis()),
        ("DB_SOCKET_TIMEOUT_MS", db.socket_timeout.as_millis()),
    ] {
        if ms == 0 {
            return Err(ConfigError::Invalid {
                var,
                value: "0".into(),
                reason: "timeout must be positive",
            });
        }
    }
    if db.max_connections == 0 {
        return Err(ConfigError::Invalid {
            var: "DB_MAX_CONNECTIONS",
            value: "0".into(),
            reason: "pool needs at least one connection",
        });
    }
    Ok(())
}
