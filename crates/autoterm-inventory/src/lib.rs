//! autoterm-inventory — an in-memory fleet for local runs and tests.
//!
//! A fleet file describes target groups and instances (id, power state,
//! tags, current target-group memberships). [`InMemoryFleet`] loads it and
//! implements every provider collaborator the engine needs, applying power
//! transitions and membership changes to its own copy and journaling each
//! successful call. The updated fleet can be written back to disk.
//!
//! ```toml
//! [[target_groups]]
//! name = "web"
//!
//! [[instances]]
//! id = "i-0abc"
//! state = "running"
//! tags = { Name = "api-1", "Auto Off" = "0 18 * * 1-5" }
//! ```

pub mod error;
pub mod file;
pub mod fleet;
pub mod types;

pub use error::{InventoryError, InventoryResult};
pub use fleet::InMemoryFleet;
pub use types::*;
