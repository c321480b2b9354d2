use std::collections::BTreeSet;

use fastref_core::{FqName, FqNameError, Name, PackageName};

/// The class a resolver is configured to recognise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetSpec {
    fq_name: FqName,
    package: PackageName,
}

impl TargetSpec {
    pub fn new(fq_name: FqName) -> Self {
        let package = fq_name.package();
        Self { fq_name, package }
    }

    pub fn parse(text: &str) -> Result<Self, FqNameError> {
        FqName::parse(text).map(Self::new)
    }

    #[inline]
    pub fn fq_name(&self) -> &FqName {
        &self.fq_name
    }

    #[inline]
    pub fn package(&self) -> &PackageName {
        &self.package
    }

    #[inline]
    pub fn simple_name(&self) -> &Name {
        self.fq_name.simple_name()
    }
}

/// Fully-qualified names that share the target's simple name but denote other
/// classes, plus packages known to declare a same-named type alias.
///
/// The registry does not validate what it is given. A conflict whose simple name
/// differs from the target's is kept but never consulted.
#[derive(Debug, Clone)]
pub struct ConflictRegistry {
    target_simple_name: Name,
    conflicts: BTreeSet<FqName>,
    type_alias_packages: BTreeSet<PackageName>,
}

impl ConflictRegistry {
    pub fn new(target: &TargetSpec) -> Self {
        Self {
            target_simple_name: target.simple_name().clone(),
            conflicts: BTreeSet::new(),
            type_alias_packages: BTreeSet::new(),
        }
    }

    pub fn add_conflict(&mut self, fq_name: FqName) {
        if fq_name.simple_name() != &self.target_simple_name {
            tracing::debug!(
                target: "fastref.resolve",
                conflict = %fq_name,
                target_simple_name = %self.target_simple_name,
                "conflict has a different simple name and will never apply"
            );
        }
        self.conflicts.insert(fq_name);
    }

    pub fn add_conflict_str(&mut self, text: &str) -> Result<(), FqNameError> {
        self.add_conflict(FqName::parse(text)?);
        Ok(())
    }

    pub fn add_type_alias_package(&mut self, package: PackageName) {
        self.type_alias_packages.insert(package);
    }

    /// Every registered conflict, including inert ones.
    pub fn conflicts(&self) -> impl Iterator<Item = &FqName> + '_ {
        self.conflicts.iter()
    }

    /// Conflicts that can actually compete with the target.
    pub fn relevant(&self) -> impl Iterator<Item = &FqName> + '_ {
        self.conflicts
            .iter()
            .filter(|fq| fq.simple_name() == &self.target_simple_name)
    }

    pub fn is_relevant_conflict(&self, fq_name: &FqName) -> bool {
        fq_name.simple_name() == &self.target_simple_name && self.conflicts.contains(fq_name)
    }

    pub fn type_alias_packages(&self) -> impl Iterator<Item = &PackageName> + '_ {
        self.type_alias_packages.iter()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }
}
