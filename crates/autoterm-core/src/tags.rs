//! Recognized tag keys and the numeric-suffix convention.
//!
//! Policy `0` reads the bare keys (`Auto On`), or `Auto On 1` when the
//! first suffix is configured non-empty. Policy `n > 0` always reads
//! `Auto On {n + 1}`.

use crate::types::TagSet;

pub const NAME: &str = "Name";
pub const DISABLE_ALL: &str = "Terminator Disable All";
pub const DISABLE: &str = "Terminator Disable";
pub const AUTO_ON: &str = "Auto On";
pub const AUTO_OFF: &str = "Auto Off";
pub const AUTO_KILL: &str = "Auto Kill";
pub const AUTO_TGR: &str = "Auto TGR";
pub const AUTO_TGD: &str = "Auto TGD";
pub const TARGET_GROUPS: &str = "Target Groups";
pub const TARGET_GROUPS_ALIAS: &str = "TG";

/// Substring a tag key must contain for a resource to be considered at all.
pub const AUTO_MARKER: &str = "Auto";

/// The five schedule keys, in the order policies store them.
pub const SCHEDULE_KEYS: [&str; 5] = [AUTO_ON, AUTO_OFF, AUTO_KILL, AUTO_TGR, AUTO_TGD];

/// Tag-key suffix for a policy index.
pub fn suffix(index: usize, first_suffix_is_empty: bool) -> String {
    if index == 0 && first_suffix_is_empty {
        String::new()
    } else {
        format!(" {}", index + 1)
    }
}

/// Full key for `base` at `suffix`, e.g. `("Auto On", " 2")` → `"Auto On 2"`.
pub fn key(base: &str, suffix: &str) -> String {
    format!("{base}{suffix}")
}

/// Value of `key` with surrounding whitespace removed; empty values read as absent.
pub fn value<'a>(tags: &'a TagSet, key: &str) -> Option<&'a str> {
    tags.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// Parse a boolean flag tag. Unknown or absent values are `false`.
pub fn parse_flag(raw: Option<&str>) -> bool {
    match raw.map(|s| s.trim().to_ascii_lowercase()) {
        Some(v) => matches!(v.as_str(), "true" | "yes" | "on" | "1"),
        None => false,
    }
}

/// Read a boolean flag tag from a tag set.
pub fn flag(tags: &TagSet, key: &str) -> bool {
    parse_flag(tags.get(key).map(String::as_str))
}

/// True when any key mentions [`AUTO_MARKER`].
pub fn has_auto_tags(tags: &TagSet) -> bool {
    tags.keys().any(|k| k.contains(AUTO_MARKER))
}

/// Raw target-group list. A present `Target Groups` key wins over the `TG`
/// alias even when blank.
pub fn target_groups(tags: &TagSet) -> Option<&str> {
    if tags.contains_key(TARGET_GROUPS) {
        value(tags, TARGET_GROUPS)
    } else {
        value(tags, TARGET_GROUPS_ALIAS)
    }
}
