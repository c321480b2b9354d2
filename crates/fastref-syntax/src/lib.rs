//! Syntax facts for Kotlin sources.
//!
//! This is deliberately not a parser. It recovers exactly what reference
//! resolution needs from a file:
//! - [`parse_header`]: the package declaration and import directives;
//! - [`find_type_references`]: occurrences of candidate names together with their
//!   explicit qualifier and syntactic position.

mod header;
pub mod lexer;
mod occurrences;

pub use header::{parse_header, FileHeader, ImportDecl};
pub use occurrences::{find_type_references, ReferenceKind, TypeReference};
