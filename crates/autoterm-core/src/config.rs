//! autoterm.toml configuration parser.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutotermConfig {
    #[serde(default)]
    pub policies: PolicyConfig,
    #[serde(default)]
    pub fleet: FleetConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Upper bound on numbered policies read per resource.
    #[serde(default = "default_max_policies")]
    pub max_policies: usize,
    /// Whether policy 0 reads the bare keys (`Auto On`) or `Auto On 1`.
    #[serde(default = "default_first_suffix_is_empty")]
    pub first_suffix_is_empty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    #[serde(default = "default_max_concurrent_resources")]
    pub max_concurrent_resources: usize,
    /// Overall cycle deadline, e.g. "90s", "4m", "1h".
    #[serde(default)]
    pub cycle_timeout: Option<String>,
    /// Prefix of the note passed along with start requests.
    #[serde(default = "default_start_note")]
    pub start_note: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn default_max_policies() -> usize {
    20
}

fn default_first_suffix_is_empty() -> bool {
    true
}

fn default_max_concurrent_resources() -> usize {
    32
}

fn default_start_note() -> String {
    "autoterm Auto On".to_string()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_policies: default_max_policies(),
            first_suffix_is_empty: default_first_suffix_is_empty(),
        }
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            max_concurrent_resources: default_max_concurrent_resources(),
            cycle_timeout: None,
            start_note: default_start_note(),
        }
    }
}

impl FleetConfig {
    /// Parsed `cycle_timeout`, if configured. Zero is rejected.
    pub fn cycle_deadline(&self) -> Result<Option<Duration>, ConfigError> {
        let Some(raw) = self.cycle_timeout.as_deref() else {
            return Ok(None);
        };
        match parse_duration(raw) {
            Some(d) if d.is_zero() => Err(ConfigError::Invalid {
                field: "fleet.cycle_timeout",
                reason: "must be greater than zero".to_string(),
            }),
            Some(d) => Ok(Some(d)),
            None => Err(ConfigError::Invalid {
                field: "fleet.cycle_timeout",
                reason: format!("cannot parse duration '{raw}'"),
            }),
        }
    }
}

impl AutotermConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AutotermConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.policies.max_policies == 0 {
            return Err(ConfigError::Invalid {
                field: "policies.max_policies",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.fleet.max_concurrent_resources == 0 {
            return Err(ConfigError::Invalid {
                field: "fleet.max_concurrent_resources",
                reason: "must be at least 1".to_string(),
            });
        }
        self.fleet.cycle_deadline()?;
        Ok(())
    }
}

/// Parse a duration string like "30s", "5m", "1h" or a bare number of seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    let secs = if let Some(secs) = s.strip_suffix('s') {
        secs.trim().parse::<u64>().ok()?
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.trim().parse::<u64>().ok()?.checked_mul(60)?
    } else if let Some(hours) = s.strip_suffix('h') {
        hours.trim().parse::<u64>().ok()?.checked_mul(3600)?
    } else {
        s.parse::<u64>().ok()?
    };
    Some(Duration::from_secs(secs))
}
