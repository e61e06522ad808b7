//! autoterm-core — shared types, tag conventions, configuration, and the
//! provider interfaces for the autoterm tag scheduler.

pub mod config;
pub mod provider;
pub mod tags;
pub mod types;

pub use config::{AutotermConfig, ConfigError, FleetConfig, PolicyConfig};
pub use provider::{
    PowerControl, ProviderError, ProviderFuture, ProviderResult, ResourceLister,
    TargetGroupControl,
};
pub use types::*;
