//! Policy extraction from a resource's flat tag set.

use autoterm_core::tags::{self, SCHEDULE_KEYS};
use autoterm_core::{Policy, PolicyConfig, PolicySchedules, TagSet};

/// Materializes numbered policies from tags.
#[derive(Debug, Clone)]
pub struct PolicyExtractor {
    max_policies: usize,
    first_suffix_is_empty: bool,
}

impl PolicyExtractor {
    pub fn new(config: &PolicyConfig) -> Self {
        Self {
            max_policies: config.max_policies,
            first_suffix_is_empty: config.first_suffix_is_empty,
        }
    }

    /// Tag-key suffix used for `index`.
    pub fn suffix(&self, index: usize) -> String {
        tags::suffix(index, self.first_suffix_is_empty)
    }

    /// All policies present on the tag set, in index order.
    ///
    /// Indices without any schedule tag are omitted, so gaps are fine.
    pub fn extract(&self, tags: &TagSet) -> Vec<Policy> {
        (0..self.max_policies)
            .filter_map(|index| self.extract_one(tags, index))
            .collect()
    }

    /// The policy at `index`, or `None` when it carries no schedule tag.
    ///
    /// A disabled index keeps its slot (so callers can report it) but
    /// none of its expressions are read.
    pub fn extract_one(&self, tags: &TagSet, index: usize) -> Option<Policy> {
        let suffix = self.suffix(index);

        if tags::flag(tags, &tags::key(tags::DISABLE, &suffix)) {
            let has_schedule = SCHEDULE_KEYS
                .iter()
                .any(|base| tags::value(tags, &tags::key(base, &suffix)).is_some());
            return has_schedule.then(|| Policy {
                index,
                disabled: true,
                schedules: PolicySchedules::default(),
            });
        }

        let read = |base: &str| tags::value(tags, &tags::key(base, &suffix)).map(str::to_string);
        let schedules = PolicySchedules {
            on: read(tags::AUTO_ON),
            off: read(tags::AUTO_OFF),
            kill: read(tags::AUTO_KILL),
            tgr: read(tags::AUTO_TGR),
            tgd: read(tags::AUTO_TGD),
        };

        if schedules.is_empty() {
            return None;
        }

        Some(Policy {
            index,
            disabled: false,
            schedules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> TagSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn extractor(max: usize, first_empty: bool) -> PolicyExtractor {
        PolicyExtractor::new(&PolicyConfig {
            max_policies: max,
            first_suffix_is_empty: first_empty,
        })
    }

    #[test]
    fn bare_keys_map_to_policy_zero() {
        let t = tags(&[("Auto Off", "0 18 * * *"), ("Auto On", "0 8 * * *")]);
        let policies = extractor(20, true).extract(&t);

        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].index, 0);
        assert_eq!(policies[0].schedules.off.as_deref(), Some("0 18 * * *"));
        assert_eq!(policies[0].schedules.on.as_deref(), Some("0 8 * * *"));
        assert!(policies[0].schedules.kill.is_none());
    }

    #[test]
    fn numbered_suffixes_map_to_index_minus_one() {
        let t = tags(&[("Auto On 2", "0 8 * * *"), ("Auto Kill 5", "0 3 * * *")]);
        let policies = extractor(20, true).extract(&t);

        let indices: Vec<usize> = policies.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![1, 4]);
    }

    #[test]
    fn one_suffixed_convention() {
        let t = tags(&[("Auto On", "0 8 * * *"), ("Auto On 1", "0 9 * * *")]);

        let policies = extractor(10, false).extract(&t);
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].schedules.on.as_deref(), Some("0 9 * * *"));

        let policies = extractor(10, true).extract(&t);
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].schedules.on.as_deref(), Some("0 8 * * *"));
    }

    #[test]
    fn bound_limits_indices() {
        let t = tags(&[("Auto Off 3", "* * * * *"), ("Auto Off 4", "* * * * *")]);
        let policies = extractor(3, true).extract(&t);
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].index, 2);
    }

    #[test]
    fn disabled_policy_reads_no_expressions() {
        let t = tags(&[
            ("Auto Off 2", "* * * * *"),
            ("Terminator Disable 2", "True"),
        ]);
        let policies = extractor(20, true).extract(&t);

        assert_eq!(policies.len(), 1);
        assert!(policies[0].disabled);
        assert!(policies[0].schedules.is_empty());
    }

    #[test]
    fn disable_flag_without_schedules_is_omitted() {
        let t = tags(&[("Terminator Disable 3", "true"), ("Auto On", "0 8 * * *")]);
        let policies = extractor(20, true).extract(&t);
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].index, 0);
    }

    #[test]
    fn false_disable_flag_keeps_policy_active() {
        let t = tags(&[("Auto On 2", "0 8 * * *"), ("Terminator Disable 2", "false")]);
        let policies = extractor(20, true).extract(&t);
        assert_eq!(policies.len(), 1);
        assert!(!policies[0].disabled);
    }

    #[test]
    fn blank_values_count_as_absent() {
        let t = tags(&[("Auto On", ""), ("Auto Off", "  ")]);
        assert!(extractor(20, true).extract(&t).is_empty());
    }

    #[test]
    fn target_group_only_policy_is_kept() {
        let t = tags(&[("Auto TGD 2", "0 17 * * *")]);
        let policies = extractor(20, true).extract(&t);
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].schedules.tgd.as_deref(), Some("0 17 * * *"));
    }
}
