//! Fleet file loading and saving.
//!
//! The format follows the extension: `.json` is JSON, anything else TOML.

use std::path::Path;

use tracing::debug;

use crate::error::{InventoryError, InventoryResult};
use crate::types::FleetFile;

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

impl FleetFile {
    /// Load and validate a fleet file.
    pub fn from_file(path: &Path) -> InventoryResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| InventoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let parse_err = |reason: String| InventoryError::Parse {
            path: path.to_path_buf(),
            reason,
        };
        let file: FleetFile = if is_json(path) {
            serde_json::from_str(&content).map_err(|e| parse_err(e.to_string()))?
        } else {
            toml::from_str(&content).map_err(|e| parse_err(e.to_string()))?
        };

        file.validate()?;
        debug!(
            ?path,
            instances = file.instances.len(),
            target_groups = file.target_groups.len(),
            "fleet file loaded"
        );
        Ok(file)
    }

    /// Serialize in the format implied by `path` and write it out.
    pub fn save(&self, path: &Path) -> InventoryResult<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)
                .map_err(|e| InventoryError::Serialize(e.to_string()))?
        } else {
            toml::to_string_pretty(self).map_err(|e| InventoryError::Serialize(e.to_string()))?
        };

        std::fs::write(path, content).map_err(|source| InventoryError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(?path, "fleet file saved");
        Ok(())
    }
}
