use crate::selection::{RosterSize, SelectionMode};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Roster size used when `TEAM_SIZE` is not set: a starting eleven.
pub const DEFAULT_TEAM_SIZE: usize = 11;

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
    pub selection: SelectionConfig,
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

        let roster = match env::var("TEAM_SIZE") {
            Ok(raw) => parse_roster(&raw)?,
            Err(_) => RosterSize::Fixed(DEFAULT_TEAM_SIZE),
        };
        let mode = match env::var("SELECTION_MODE") {
            Ok(raw) => raw
                .parse::<SelectionMode>()
                .map_err(|_| ConfigError::InvalidSelectionMode { value: raw })?,
            Err(_) => SelectionMode::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            selection: SelectionConfig { roster, mode },
        })
    }
}

fn parse_roster(raw: &str) -> Result<RosterSize, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("none") || trimmed.eq_ignore_ascii_case("unbounded") {
        return Ok(RosterSize::Unbounded);
    }

    trimmed
        .parse::<usize>()
        .map(RosterSize::Fixed)
        .map_err(|_| ConfigError::InvalidTeamSize {
            value: raw.to_string(),
        })
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

/// Defaults applied to every selection run unless a caller overrides them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionConfig {
    pub roster: RosterSize,
    pub mode: SelectionMode,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            roster: RosterSize::Fixed(DEFAULT_TEAM_SIZE),
            mode: SelectionMode::Binary,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTeamSize { value: String },
    InvalidSelectionMode { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTeamSize { value } => write!(
                f,
                "TEAM_SIZE must be a non-negative integer or 'unbounded' (got '{value}')"
            ),
            ConfigError::InvalidSelectionMode { value } => write!(
                f,
                "SELECTION_MODE must be 'binary' or 'fractional' (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTeamSize { .. }
            | ConfigError::InvalidSelectionMode { .. } => None,
        }
    }
}
