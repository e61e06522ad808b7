//! `Target Groups` tag parsing.
//!
//! The tag value is a comma-separated list of `name:port` entries. Names
//! and ports are taken from the same split, then aligned by extrapolation:
//! a short ports list repeats its last element (or `80` when it is empty)
//! and a short names list repeats its last name. A list without any `:`
//! is pure name shorthand and gets an empty ports list, so every name
//! lands on port 80.
//!
//! ```text
//! "web:80,api:8080"   → [web:80, api:8080]
//! "web,api"           → [web:80, api:80]
//! "web:8080,api,db"   → [web:8080]        (api, db rejected: no port)
//! ```

use autoterm_core::TargetGroupBinding;

const DEFAULT_PORT: &str = "80";

/// Outcome of parsing one target-group tag value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTargetGroups {
    /// Valid bindings in declaration order. Duplicates are kept.
    pub bindings: Vec<TargetGroupBinding>,
    /// Raw entries that failed validation.
    pub rejected: Vec<String>,
}

/// Parse a `Target Groups` / `TG` tag value.
pub fn parse_target_groups(raw: Option<&str>) -> ParsedTargetGroups {
    let raw = match raw.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return ParsedTargetGroups::default(),
    };

    let mut names: Vec<String> = raw.split(',').map(str::to_string).collect();
    let name_only = names.iter().all(|n| !n.contains(':'));
    let mut ports: Vec<String> = if name_only { Vec::new() } else { names.clone() };

    while names.len() > ports.len() {
        let fill = ports.last().cloned().unwrap_or_else(|| DEFAULT_PORT.to_string());
        ports.push(fill);
    }
    while ports.len() > names.len() {
        let fill = names.last().cloned().unwrap_or_default();
        names.push(fill);
    }

    let mut parsed = ParsedTargetGroups::default();
    for (name, port) in names.iter().zip(&ports) {
        let entry = if name_only {
            format!("{}:{}", name.trim(), port.trim())
        } else {
            name.trim().to_string()
        };

        match parse_entry(&entry) {
            Some(binding) => parsed.bindings.push(binding),
            None => parsed.rejected.push(name.clone()),
        }
    }
    parsed
}

/// Validate a single `name:port` entry.
fn parse_entry(entry: &str) -> Option<TargetGroupBinding> {
    let parts: Vec<&str> = entry.split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let name = parts[0].trim();
    let port = parts[1].trim();
    if name.is_empty() || port.is_empty() {
        return None;
    }
    match port.parse::<u16>() {
        Ok(p) if p >= 1 => Some(TargetGroupBinding::new(name, p)),
        _ => None,
    }
}
