//! Core shared types for fastref.
//!
//! Everything here is plain data: dotted names and text positions. The crate has no
//! knowledge of imports or resolution rules.

mod name;
mod text;

pub use name::{FqName, FqNameError, Name, PackageName, QualifiedName};
pub use text::{LineCol, LineIndex, TextRange, TextSize};
