//! # Runtime Configuration
//!
//! One TOML file plus `PORTSIDE_*` environment overrides.
//!
//! ```toml
//! lease_duration_secs = 3600
//! gateway = "http://192.168.1.1:5000/rootDesc.xml"
//! refresh_interval_secs = 900
//! watch_events = true
//! cleanup_on_stop = true
//!
//! [logging]
//! level = "info"
//!
//! [[ports]]
//! external_port = 8080
//! internal_port = 80
//! protocol = "tcp"
//! name = "web"
//! ```

use std::env;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use portside_telemetry::TelemetryConfig;
use ps_01_label_extractor::{LabelConfig, DEFAULT_LABEL_PREFIX};
use ps_03_gateway_client::GatewayClientConfig;
use ps_04_orchestrator::OrchestratorConfig;
use serde::{Deserialize, Serialize};
use shared_types::PortMappingEntry;
use thiserror::Error;
use url::Url;

/// Default interval between full refreshes.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 15 * 60;

/// Errors that can occur during config loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },

    /// TOML parsing error.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// An environment override has an unusable value.
    #[error("Invalid value {value:?} for {var}: {reason}")]
    Env {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
        /// Parser message.
        reason: String,
    },
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Filter directives; environment settings apply when unset.
    pub level: Option<String>,
    /// JSON output.
    pub json: Option<bool>,
}

/// Daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Lease requested for each mapping, in seconds.
    pub lease_duration_secs: u64,
    /// Gateway description URL; discovered when unset.
    pub gateway: Option<Url>,
    /// Internal client address; detected when unset.
    pub local_ip: Option<Ipv4Addr>,
    /// Seconds between full refreshes.
    pub refresh_interval_secs: u64,
    /// Delete gateway mappings when their workload stops.
    pub cleanup_on_stop: bool,
    /// Follow workload lifecycle events.
    pub watch_events: bool,
    /// Log gateway calls instead of sending them.
    pub dry_run: bool,
    /// Prefix of the workload labels.
    pub label_prefix: String,
    /// Logging.
    pub logging: LoggingSection,
    /// Configured mappings. Validated by the config provider on every fetch.
    pub ports: Option<Vec<PortMappingEntry>>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let gateway = GatewayClientConfig::default();
        Self {
            lease_duration_secs: gateway.lease_duration_secs,
            gateway: None,
            local_ip: None,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            cleanup_on_stop: false,
            watch_events: false,
            dry_run: false,
            label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
            logging: LoggingSection::default(),
            ports: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply overrides from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `PORTSIDE_GATEWAY`: gateway URL
    /// - `PORTSIDE_LOCAL_IP`: internal client address
    /// - `PORTSIDE_LEASE_DURATION_SECS`: lease in seconds
    /// - `PORTSIDE_REFRESH_INTERVAL_SECS`: refresh interval in seconds
    /// - `PORTSIDE_DRY_RUN`, `PORTSIDE_WATCH_EVENTS`, `PORTSIDE_CLEANUP_ON_STOP`: flags
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_lookup(|key| env::var(key).ok())
    }

    /// Same as [`apply_env`](Self::apply_env) over an arbitrary lookup.
    pub fn apply_lookup<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("PORTSIDE_GATEWAY") {
            self.gateway = Some(parse_var("PORTSIDE_GATEWAY", &value, |v| Url::parse(v))?);
        }
        if let Some(value) = lookup("PORTSIDE_LOCAL_IP") {
            self.local_ip = Some(parse_var("PORTSIDE_LOCAL_IP", &value, str::parse)?);
        }
        if let Some(value) = lookup("PORTSIDE_LEASE_DURATION_SECS") {
            self.lease_duration_secs =
                parse_var("PORTSIDE_LEASE_DURATION_SECS", &value, str::parse)?;
        }
        if let Some(value) = lookup("PORTSIDE_REFRESH_INTERVAL_SECS") {
            self.refresh_interval_secs =
                parse_var("PORTSIDE_REFRESH_INTERVAL_SECS", &value, str::parse)?;
        }
        if let Some(value) = lookup("PORTSIDE_DRY_RUN") {
            self.dry_run = parse_flag("PORTSIDE_DRY_RUN", &value)?;
        }
        if let Some(value) = lookup("PORTSIDE_WATCH_EVENTS") {
            self.watch_events = parse_flag("PORTSIDE_WATCH_EVENTS", &value)?;
        }
        if let Some(value) = lookup("PORTSIDE_CLEANUP_ON_STOP") {
            self.cleanup_on_stop = parse_flag("PORTSIDE_CLEANUP_ON_STOP", &value)?;
        }
        Ok(())
    }

    /// Refresh interval, at least one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    /// Gateway client settings.
    pub fn gateway_config(&self) -> GatewayClientConfig {
        GatewayClientConfig {
            local_ip: self.local_ip,
            gateway_url: self.gateway.clone(),
            lease_duration_secs: self.lease_duration_secs,
            dry_run: self.dry_run,
            ..GatewayClientConfig::default()
        }
    }

    /// Orchestrator settings.
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            cleanup_on_stop: self.cleanup_on_stop,
            ..OrchestratorConfig::default()
        }
    }

    /// Label keys.
    pub fn label_config(&self) -> LabelConfig {
        LabelConfig::with_prefix(&self.label_prefix)
    }

    /// Logging settings: the `[logging]` section over `base`.
    pub fn telemetry_config(&self, base: TelemetryConfig) -> TelemetryConfig {
        TelemetryConfig {
            log_level: self.logging.level.clone().unwrap_or(base.log_level),
            json_logs: self.logging.json.unwrap_or(base.json_logs),
            ..base
        }
    }
}

fn parse_var<T, E, F>(var: &'static str, value: &str, parse: F) -> Result<T, ConfigError>
where
    F: FnOnce(&str) -> Result<T, E>,
    E: std::fmt::Display,
{
    parse(value.trim()).map_err(|e| ConfigError::Env {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Env {
            var,
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
