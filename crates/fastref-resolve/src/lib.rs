//! Cheap, purely syntactic class-reference resolution.
//!
//! A [`ClassResolver`] is configured with one target class (`org.junit.Test`) and a
//! set of known impostors sharing its simple name (`org.testng.Test`). Given the
//! package and imports of a file ([`FileContext`]) and the facts about one reference
//! occurrence ([`ReferenceFacts`]) it answers with a [`Verdict`]:
//!
//! - [`Verdict::Match`]: the reference provably denotes the target;
//! - [`Verdict::NoMatch`]: it provably does not;
//! - [`Verdict::Indeterminate`]: local facts are not enough and the caller must fall
//!   back to full resolution (or skip the reference).
//!
//! Only annotation entries and supertype constructor calls ever get a definite
//! answer; every other position is `Indeterminate`.

mod import_map;
mod reference;
mod resolver;
mod stats;
mod target;

pub use import_map::{FileContext, ImportDirective};
pub use reference::{FactsError, ReferenceFacts, ReferenceRole};
pub use resolver::{resolve, ClassResolver, Verdict};
pub use stats::{ResolverStats, StatsSnapshot};
pub use target::{ConflictRegistry, TargetSpec};
