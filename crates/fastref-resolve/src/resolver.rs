use fastref_core::{FqName, Name, PackageName};
use serde::Serialize;

use crate::{
    ConflictRegistry, FileContext, ReferenceFacts, ReferenceRole, ResolverStats, StatsSnapshot,
    TargetSpec,
};

/// Outcome of resolving one reference against the target.
///
/// Deliberately not convertible to or from `bool`: treating `Indeterminate` as
/// `false` turns "unknown" into a false negative for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Match,
    NoMatch,
    Indeterminate,
}

impl Verdict {
    #[inline]
    pub fn is_match(self) -> bool {
        self == Verdict::Match
    }

    #[inline]
    pub fn is_no_match(self) -> bool {
        self == Verdict::NoMatch
    }

    #[inline]
    pub fn is_indeterminate(self) -> bool {
        self == Verdict::Indeterminate
    }

    /// `Some(true)` / `Some(false)` for definite verdicts, `None` otherwise.
    pub fn as_definite(self) -> Option<bool> {
        match self {
            Verdict::Match => Some(true),
            Verdict::NoMatch => Some(false),
            Verdict::Indeterminate => None,
        }
    }
}

/// Decides whether `reference` can denote `target` using only local syntactic facts.
///
/// Total and side-effect free: the same inputs always give the same verdict.
pub fn resolve(
    target: &TargetSpec,
    conflicts: &ConflictRegistry,
    file: &FileContext,
    reference: &ReferenceFacts,
) -> Verdict {
    if reference.role() == ReferenceRole::Other {
        return Verdict::Indeterminate;
    }

    if let Some(qualifier) = reference.qualifier() {
        // A matching qualifier is suggestive, never proof.
        return if qualifier == target.package().as_qualified() {
            Verdict::Indeterminate
        } else {
            Verdict::NoMatch
        };
    }

    let written = reference.written_text();
    let mut target_bound = false;
    let mut conflict_bound = false;
    for (fq_name, binding) in file.explicit_imports() {
        if binding != written {
            continue;
        }
        if fq_name == target.fq_name() {
            target_bound = true;
        } else if conflicts.is_relevant_conflict(fq_name) {
            conflict_bound = true;
        } else {
            // Some unrelated class is bound to exactly this name.
            return Verdict::Indeterminate;
        }
    }

    if conflicts
        .type_alias_packages()
        .any(|package| file.has_ambient_access(package))
    {
        return Verdict::Indeterminate;
    }

    let ambient_target = file.has_ambient_access(target.package());
    let ambient_conflict = conflicts
        .relevant()
        .any(|conflict| file.has_ambient_access(&conflict.package()));

    match (target_bound, conflict_bound) {
        (true, _) if ambient_conflict => Verdict::Indeterminate,
        (true, _) => Verdict::Match,
        (false, true) if ambient_target => Verdict::Indeterminate,
        (false, true) => Verdict::NoMatch,
        (false, false) => match (ambient_target, ambient_conflict) {
            (true, true) => Verdict::Indeterminate,
            (true, false) => Verdict::Match,
            (false, _) => Verdict::NoMatch,
        },
    }
}

/// A configured resolver for one target class.
///
/// Configuration (`add_conflict`, `add_type_alias_package`) takes `&mut self`, so
/// it has to finish before the resolver is shared across threads for queries.
#[derive(Debug)]
pub struct ClassResolver {
    target: TargetSpec,
    conflicts: ConflictRegistry,
    stats: ResolverStats,
}

impl ClassResolver {
    pub fn new(target: TargetSpec) -> Self {
        let conflicts = ConflictRegistry::new(&target);
        Self {
            target,
            conflicts,
            stats: ResolverStats::default(),
        }
    }

    pub fn add_conflict(&mut self, fq_name: FqName) -> &mut Self {
        self.conflicts.add_conflict(fq_name);
        self
    }

    pub fn add_type_alias_package(&mut self, package: PackageName) -> &mut Self {
        self.conflicts.add_type_alias_package(package);
        self
    }

    #[inline]
    pub fn target(&self) -> &TargetSpec {
        &self.target
    }

    #[inline]
    pub fn conflicts(&self) -> &ConflictRegistry {
        &self.conflicts
    }

    pub fn resolve(&self, file: &FileContext, reference: &ReferenceFacts) -> Verdict {
        let verdict = resolve(&self.target, &self.conflicts, file, reference);
        self.stats.record(verdict);
        tracing::debug!(
            target: "fastref.resolve",
            target_class = %self.target.fq_name(),
            reference = %reference.written_text(),
            role = ?reference.role(),
            ?verdict,
            "resolved reference"
        );
        verdict
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Names under which the target or a competing conflict can be written in `file`:
    /// the target's simple name plus every alias of an explicit import of either.
    ///
    /// Scanning only for these names never misses a reference that could get a
    /// definite verdict.
    pub fn candidate_names(&self, file: &FileContext) -> Vec<Name> {
        let mut names = vec![self.target.simple_name().clone()];
        for (fq_name, binding) in file.explicit_imports() {
            let relevant =
                fq_name == self.target.fq_name() || self.conflicts.is_relevant_conflict(fq_name);
            if relevant && !names.contains(binding) {
                names.push(binding.clone());
            }
        }
        names
    }
}
