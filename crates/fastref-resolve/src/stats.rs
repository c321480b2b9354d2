use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::Verdict;

/// How often a resolver was asked and how often it could answer on its own.
///
/// Counters are updated with relaxed ordering; they are diagnostics and never feed
/// back into a verdict.
#[derive(Debug, Default)]
pub struct ResolverStats {
    attempts: AtomicU64,
    matches: AtomicU64,
    no_matches: AtomicU64,
    indeterminate: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub attempts: u64,
    pub matches: u64,
    pub no_matches: u64,
    pub indeterminate: u64,
}

impl StatsSnapshot {
    /// Share of attempts answered without falling back to full resolution.
    pub fn hit_rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        (self.matches + self.no_matches) as f64 / self.attempts as f64
    }
}

impl ResolverStats {
    pub(crate) fn record(&self, verdict: Verdict) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        let counter = match verdict {
            Verdict::Match => &self.matches,
            Verdict::NoMatch => &self.no_matches,
            Verdict::Indeterminate => &self.indeterminate,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            attempts: self.attempts.load(Ordering::Relaxed),
            matches: self.matches.load(Ordering::Relaxed),
            no_matches: self.no_matches.load(Ordering::Relaxed),
            indeterminate: self.indeterminate.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.attempts.store(0, Ordering::Relaxed);
        self.matches.store(0, Ordering::Relaxed);
        self.no_matches.store(0, Ordering::Relaxed);
        self.indeterminate.store(0, Ordering::Relaxed);
    }
}
