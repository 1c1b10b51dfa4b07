use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Settings for the dashboard service, read from `APP_*` variables (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = env_value("APP_ENV")
            .map(|value| AppEnvironment::parse(&value))
            .unwrap_or_default();

        let port = match env_value("APP_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host: env_value("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: env_value("APP_LOG_LEVEL")
                    .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            },
            catalog: CatalogConfig {
                path: env_value("APP_CATALOG_PATH").map(PathBuf::from),
            },
        })
    }
}

/// Trimmed variable value; blank counts as unset.
fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost {
                    value: self.host.clone(),
                    source,
                })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where classification records come from. `None` serves the built-in sample catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort {
        value: String,
    },
    InvalidHost {
        value: String,
        source: std::net::AddrParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "APP_PORT '{}' is not a valid port number", value)
            }
            ConfigError::InvalidHost { value, .. } => {
                write!(f, "APP_HOST '{}' is not an IPv4 or IPv6 address", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort { .. } => None,
            ConfigError::InvalidHost { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    const KEYS: [&str; 5] = [
        "APP_ENV",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "APP_CATALOG_PATH",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn with_env(vars: &[(&str, &str)], check: impl FnOnce()) {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        for key in KEYS {
            env::remove_var(key);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
        check();
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn defaults_apply_when_unset() {
        with_env(&[], || {
            let config = AppConfig::load().expect("config loads with defaults");
            assert_eq!(config.environment, AppEnvironment::Development);
            assert_eq!(config.server.host, DEFAULT_HOST);
            assert_eq!(config.server.port, DEFAULT_PORT);
            assert_eq!(config.telemetry.log_level, DEFAULT_LOG_LEVEL);
            assert!(config.catalog.path.is_none());
        });
    }

    #[test]
    fn reads_catalog_path_and_environment() {
        with_env(
            &[("APP_ENV", "prod"), ("APP_CATALOG_PATH", " /srv/catalog.csv ")],
            || {
                let config = AppConfig::load().expect("config loads");
                assert_eq!(config.environment, AppEnvironment::Production);
                assert_eq!(config.catalog.path, Some(PathBuf::from("/srv/catalog.csv")));
            },
        );
    }

    #[test]
    fn blank_catalog_path_means_sample() {
        with_env(&[("APP_CATALOG_PATH", "   ")], || {
            let config = AppConfig::load().expect("config loads");
            assert!(config.catalog.path.is_none());
        });
    }

    #[test]
    fn rejects_invalid_port() {
        with_env(&[("APP_PORT", "http")], || {
            let error = AppConfig::load().expect_err("port must be numeric");
            assert_eq!(
                error.to_string(),
                "APP_PORT 'http' is not a valid port number"
            );
        });
    }

    #[test]
    fn localhost_binds_loopback() {
        with_env(&[("APP_HOST", "localhost")], || {
            let config = AppConfig::load().expect("config loads");
            let addr = config.server.socket_addr().expect("localhost resolves");
            assert_eq!(addr, SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000));
        });
    }

    #[test]
    fn rejects_hostnames() {
        let server = ServerConfig {
            host: "dashboard.internal".to_string(),
            port: 8080,
        };
        assert!(matches!(
            server.socket_addr(),
            Err(ConfigError::InvalidHost { .. })
        ));
    }
}
