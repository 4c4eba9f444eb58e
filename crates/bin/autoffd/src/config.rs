//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `autoff.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use autoff_domain::target::{DEFAULT_ELIGIBLE_FAMILIES, TargetId};
use autoff_domain::timer::{DEFAULT_DURATION_SECONDS, RestartMode, TimerConfig, validate_duration};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Snapshot persistence settings.
    pub storage: StorageConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Timer defaults and pre-declared targets.
    pub timers: TimersConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Snapshot file configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON file holding persisted timer deadlines.
    pub snapshot_path: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Timer defaults and the targets to attach at boot.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TimersConfig {
    /// Duration applied to targets without their own override, in seconds.
    pub default_duration: u32,
    /// Device families timers may attach to.
    pub families: Vec<String>,
    /// Targets that get a timer when the daemon starts.
    pub targets: Vec<TargetEntry>,
}

/// One pre-declared auto-off target.
///
/// Missing fields fall back to enabled, the global default duration and
/// the `on_only` restart policy.
#[derive(Debug, Deserialize)]
pub struct TargetEntry {
    /// Target id in `family.object` form.
    pub id: String,
    /// Whether the timer reacts to state changes and service calls.
    pub enabled: Option<bool>,
    /// Per-target duration override, in seconds.
    pub duration_seconds: Option<u32>,
    /// Per-target restart policy override.
    pub restart_mode: Option<RestartMode>,
}

impl Config {
    /// Load configuration from `autoff.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if
    /// the merged result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("autoff.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("AUTOFF_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("AUTOFF_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("AUTOFF_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("AUTOFF_SNAPSHOT_PATH") {
            self.storage.snapshot_path = val;
        }
        if let Ok(val) = std::env::var("AUTOFF_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        validate_duration(self.timers.default_duration)
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        for entry in &self.timers.targets {
            let target = TargetId::parse(entry.id.as_str())
                .map_err(|err| ConfigError::Validation(err.to_string()))?;
            if !self.timers.families.iter().any(|family| family == target.family()) {
                return Err(ConfigError::Validation(format!(
                    "target `{target}` is outside the configured families"
                )));
            }
            if let Some(seconds) = entry.duration_seconds {
                validate_duration(seconds)
                    .map_err(|err| ConfigError::Validation(err.to_string()))?;
            }
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the snapshot file path.
    #[must_use]
    pub fn snapshot_path(&self) -> &str {
        &self.storage.snapshot_path
    }

    /// Build the timer configuration for every declared target, resolving
    /// missing fields against the `[timers]` defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when an entry fails domain validation.
    pub fn timer_configs(&self) -> Result<Vec<TimerConfig>, ConfigError> {
        self.timers
            .targets
            .iter()
            .map(|entry| {
                let target = TargetId::parse(entry.id.as_str())
                    .map_err(|err| ConfigError::Validation(err.to_string()))?;
                let mut builder = TimerConfig::builder()
                    .target(target)
                    .enabled(entry.enabled.unwrap_or(true))
                    .duration_seconds(
                        entry.duration_seconds.unwrap_or(self.timers.default_duration),
                    );
                if let Some(mode) = entry.restart_mode {
                    builder = builder.restart_mode(mode);
                }
                builder
                    .build()
                    .map_err(|err| ConfigError::Validation(err.to_string()))
            })
            .collect()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: "autoff-timers.json".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "autoffd=info,autoff=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for TimersConfig {
    fn default() -> Self {
        Self {
            default_duration: DEFAULT_DURATION_SECONDS,
            families: DEFAULT_ELIGIBLE_FAMILIES
                .iter()
                .map(ToString::to_string)
                .collect(),
            targets: Vec::new(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
