//! Collaborator interfaces the engine dispatches to.
//!
//! The engine never talks to a cloud API directly. It lists resources
//! through [`ResourceLister`] and applies actions through
//! [`PowerControl`] and [`TargetGroupControl`]. All three are injected as
//! `Arc<dyn ...>` so a cycle can run against a real provider or the
//! in-memory inventory used by tests and the CLI.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::types::{ResourceState, StateChange, TargetGroupHandle};

/// Result type alias for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Boxed future returned by collaborator methods.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = ProviderResult<T>> + Send + 'a>>;

/// Errors reported by provider collaborators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("resource {id} is {state}, cannot {operation}")]
    InvalidState {
        id: String,
        state: String,
        operation: &'static str,
    },

    #[error("provider api error: {0}")]
    Api(String),
}

/// Lists every resource of the fleet with its tags and power state.
pub trait ResourceLister: Send + Sync {
    fn list(&self) -> ProviderFuture<'_, Vec<ResourceState>>;
}

/// Start / stop / terminate operations on a single instance.
pub trait PowerControl: Send + Sync {
    fn stop<'a>(&'a self, id: &'a str) -> ProviderFuture<'a, StateChange>;

    /// Start an instance. `note` is free text recorded by the provider.
    fn start<'a>(&'a self, id: &'a str, note: &'a str) -> ProviderFuture<'a, StateChange>;

    fn terminate<'a>(&'a self, id: &'a str) -> ProviderFuture<'a, StateChange>;
}

/// Load-balancer target group membership.
pub trait TargetGroupControl: Send + Sync {
    /// Resolve a target group by name. `Ok(None)` when it does not exist.
    fn lookup<'a>(&'a self, name: &'a str) -> ProviderFuture<'a, Option<TargetGroupHandle>>;

    fn register<'a>(
        &'a self,
        group: &'a TargetGroupHandle,
        id: &'a str,
        port: u16,
    ) -> ProviderFuture<'a, ()>;

    fn deregister<'a>(&'a self, group: &'a TargetGroupHandle, id: &'a str)
    -> ProviderFuture<'a, ()>;
}
