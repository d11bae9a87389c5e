use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let mode = match env::var("APP_SCORING_MODE") {
            Ok(value) => ScoringMode::parse(&value)?,
            Err(_) => ScoringMode::Fuzzy,
        };
        let resolution = match env::var("APP_RISK_RESOLUTION") {
            Ok(value) => parse_resolution(&value)?,
            Err(_) => ScoringConfig::DEFAULT_RESOLUTION,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig { mode, resolution },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// How client profiles are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    /// Fuzzy inference, with the fallback scorer only when inference is undefined.
    Fuzzy,
    /// Skip the engine entirely.
    Fallback,
}

impl ScoringMode {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fuzzy" => Ok(Self::Fuzzy),
            "fallback" => Ok(Self::Fallback),
            _ => Err(ConfigError::InvalidScoringMode {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub mode: ScoringMode,
    /// Grid step of the risk output universe.
    pub resolution: f64,
}

impl ScoringConfig {
    pub const DEFAULT_RESOLUTION: f64 = crate::assessment::model::DEFAULT_RISK_RESOLUTION;
    pub const MIN_RESOLUTION: f64 = 0.001;
    pub const MAX_RESOLUTION: f64 = 10.0;
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            mode: ScoringMode::Fuzzy,
            resolution: Self::DEFAULT_RESOLUTION,
        }
    }
}

/// Resolution must be in `[0.001, 10]` and split `[0, 100]` into whole steps.
fn parse_resolution(value: &str) -> Result<f64, ConfigError> {
    let invalid = || ConfigError::InvalidResolution {
        value: value.to_string(),
    };
    let resolution = value.trim().parse::<f64>().map_err(|_| invalid())?;
    if !(ScoringConfig::MIN_RESOLUTION..=ScoringConfig::MAX_RESOLUTION).contains(&resolution) {
        return Err(invalid());
    }

    let steps = 100.0 / resolution;
    if (steps - steps.round()).abs() > 1e-9 * steps {
        return Err(invalid());
    }
    Ok(resolution)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidScoringMode { value: String },
    InvalidResolution { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidScoringMode { value } => {
                write!(f, "APP_SCORING_MODE must be `fuzzy` or `fallback` (got '{value}')")
            }
            ConfigError::InvalidResolution { value } => write!(
                f,
                "APP_RISK_RESOLUTION must be in [0.001, 10] and divide 100 evenly (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidScoringMode { .. }
            | ConfigError::InvalidResolution { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_SCORING_MODE");
        env::remove_var("APP_RISK_RESOLUTION");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn rejects_invalid_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "70000");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidPort)));
        reset_env();
    }

    #[test]
    fn reads_scoring_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_SCORING_MODE", " Fallback ");
        env::set_var("APP_RISK_RESOLUTION", "0.5");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.scoring.mode, ScoringMode::Fallback);
        assert_eq!(config.scoring.resolution, 0.5);
        reset_env();
    }

    #[test]
    fn rejects_unknown_scoring_mode() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_SCORING_MODE", "neural");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidScoringMode { .. })
        ));
        reset_env();
    }

    #[test]
    fn resolution_must_divide_the_risk_range() {
        assert_eq!(parse_resolution("1").ok(), Some(1.0));
        assert_eq!(parse_resolution("0.25").ok(), Some(0.25));
        assert_eq!(parse_resolution("0.001").ok(), Some(0.001));
        for bad in [
            "0", "-1", "0.3", "12", "abc", "NaN", "inf", "0.0005", "0.000001", "0.0000001",
        ] {
            assert!(
                matches!(parse_resolution(bad), Err(ConfigError::InvalidResolution { .. })),
                "{bad} should be rejected"
            );
        }
    }
}
