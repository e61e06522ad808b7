//! Static validation of every instance's scheduling tags.

use std::collections::HashSet;

use anyhow::bail;

use autoterm_core::tags::{self, SCHEDULE_KEYS};
use autoterm_core::{AutotermConfig, TagSet};
use autoterm_engine::{ScheduleEvaluator, parse_target_groups};
use autoterm_inventory::FleetFile;

use super::load_config;
use crate::Common;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub resource: String,
    pub tag: String,
    pub message: String,
}

pub fn check(common: &Common) -> anyhow::Result<()> {
    let config = load_config(common.config.as_deref())?;
    let file = FleetFile::from_file(&common.inventory)?;

    let problems = check_fleet(&file, &config);
    for p in &problems {
        println!("{} [{}]: {}", p.resource, p.tag, p.message);
    }
    if !problems.is_empty() {
        bail!("{} problem(s) found", problems.len());
    }
    println!("{} instances checked, no problems", file.instances.len());
    Ok(())
}

/// Every malformed expression, target-group entry, or unreachable tag.
pub fn check_fleet(file: &FleetFile, config: &AutotermConfig) -> Vec<Problem> {
    let known_groups: HashSet<&str> = file.target_groups.iter().map(|g| g.name.as_str()).collect();
    let mut problems = Vec::new();

    for instance in &file.instances {
        if !tags::has_auto_tags(&instance.tags) {
            continue;
        }
        let mut report = |tag: &str, message: String| {
            problems.push(Problem {
                resource: instance.id.clone(),
                tag: tag.to_string(),
                message,
            })
        };

        check_expressions(&instance.tags, config, &mut report);

        let tg_key = if instance.tags.contains_key(tags::TARGET_GROUPS) {
            tags::TARGET_GROUPS
        } else {
            tags::TARGET_GROUPS_ALIAS
        };
        let parsed = parse_target_groups(tags::target_groups(&instance.tags));
        for entry in &parsed.rejected {
            report(tg_key, format!("invalid entry {entry:?}"));
        }
        for binding in &parsed.bindings {
            if !known_groups.contains(binding.name.as_str()) {
                report(tg_key, format!("target group {} does not exist", binding.name));
            }
        }
    }
    problems
}

fn check_expressions(
    tag_set: &TagSet,
    config: &AutotermConfig,
    report: &mut impl FnMut(&str, String),
) {
    let evaluator = ScheduleEvaluator::new();
    let max = config.policies.max_policies;
    let first_empty = config.policies.first_suffix_is_empty;
    let mut read = HashSet::new();

    for index in 0..max {
        let suffix = tags::suffix(index, first_empty);
        for base in SCHEDULE_KEYS {
            let key = tags::key(base, &suffix);
            if let Some(expr) = tags::value(tag_set, &key) {
                if let Err(e) = evaluator.validate(expr) {
                    report(&key, e.to_string());
                }
            }
            read.insert(key);
        }
    }

    for key in tag_set.keys().filter(|k| !read.contains(*k)) {
        for base in SCHEDULE_KEYS {
            let Some(rest) = key.strip_prefix(base) else {
                continue;
            };
            if key.trim_end() != key {
                report(key, "trailing whitespace in key, never evaluated".to_string());
            } else if rest.is_empty() {
                report(
                    key,
                    "unsuffixed key is never evaluated (first_suffix_is_empty = false)".to_string(),
                );
            } else if let Ok(n) = rest.trim().parse::<usize>() {
                let message = if n > max {
                    format!("beyond max_policies ({max}), never evaluated")
                } else if n == 1 && first_empty {
                    "never evaluated, the first policy uses the unsuffixed key".to_string()
                } else {
                    format!("suffix {n} is never evaluated")
                };
                report(key, message);
            }
        }
    }
}
