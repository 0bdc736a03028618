//! Retention policy evaluator.
//!
//! Decides which published versions are stale enough to delete, based on how
//! long ago each was last downloaded and how many times it was downloaded in
//! total. The policy is an ordered table of `(min_age_days, max_downloads)`
//! rules evaluated from the largest age bound downward; the first rule whose
//! age bound the artifact meets governs it. Thresholds grow with age: an old
//! artifact must show more cumulative popularity to survive than a recent one.

use chrono::{DateTime, Utc};

use crate::model::ArtifactStats;

/// One row of the policy table: artifacts last downloaded at least
/// `min_age_days` ago are deletable when their total download count is at
/// most `max_downloads`.
#[derive(Debug, Clone)]
pub struct RetentionRule {
    pub min_age_days: i64,
    pub max_downloads: u64,
    pub label: &'static str,
}

/// Ordered retention rule table.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    rules: Vec<RetentionRule>,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(vec![
            RetentionRule {
                min_age_days: 180,
                max_downloads: 5,
                label: "> 6 months",
            },
            RetentionRule {
                min_age_days: 30,
                max_downloads: 3,
                label: "> 1 month",
            },
            RetentionRule {
                min_age_days: 7,
                max_downloads: 2,
                label: "> 1 week",
            },
            RetentionRule {
                min_age_days: 0,
                max_downloads: 0,
                label: "< 1 week",
            },
        ])
    }
}

impl RetentionPolicy {
    /// Build a policy from a rule table. Rules are sorted by descending age
    /// bound so callers may pass them in any order.
    pub fn new(mut rules: Vec<RetentionRule>) -> Self {
        rules.sort_by(|a, b| b.min_age_days.cmp(&a.min_age_days));
        Self { rules }
    }

    /// The rule governing an artifact last downloaded `age_days` ago, i.e.
    /// the oldest bucket whose bound the age meets. `None` only for an empty
    /// table, in which case nothing is ever stale.
    pub fn rule_for(&self, age_days: i64) -> Option<&RetentionRule> {
        self.rules.iter().find(|r| age_days >= r.min_age_days)
    }

    /// The rule governing one artifact at instant `now`.
    pub fn governing_rule(&self, stats: &ArtifactStats, now: DateTime<Utc>) -> Option<&RetentionRule> {
        self.rule_for(age_days(stats, now))
    }

    /// Whether a single artifact is eligible for deletion at instant `now`.
    ///
    /// A missing last-download timestamp counts as maximally old: artifacts
    /// with no usage signal at all are always pruned.
    pub fn is_stale(&self, stats: &ArtifactStats, now: DateTime<Utc>) -> bool {
        self.governing_rule(stats, now)
            .is_some_and(|rule| stats.download_count <= rule.max_downloads)
    }

    /// Select the stale subset of `stats`, preserving relative order.
    ///
    /// Pure function of its inputs; `now` is injected so runs are
    /// deterministic under test.
    pub fn select_stale<'a>(
        &self,
        stats: &'a [ArtifactStats],
        now: DateTime<Utc>,
    ) -> Vec<&'a ArtifactStats> {
        stats.iter().filter(|s| self.is_stale(s, now)).collect()
    }
}

/// Calendar-day age of the last download. Timestamps in the future clamp to
/// zero; a missing timestamp is maximally old.
fn age_days(stats: &ArtifactStats, now: DateTime<Utc>) -> i64 {
    match stats.last_downloaded {
        Some(ts) => (now - ts).num_days().max(0),
        None => i64::MAX,
    }
}
