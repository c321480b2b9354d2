use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use thiserror::Error;

/// A single identifier segment (`Test`, `junit`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(SmolStr);

impl Name {
    #[inline]
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(SmolStr::new(text))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Self(SmolStr::from(value))
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered, possibly empty, sequence of name segments.
///
/// `from_dotted` is lenient: it never fails and is meant for text that already went
/// through a parser. Use [`FqName::parse`] for names coming from users or config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    segments: Vec<Name>,
}

impl QualifiedName {
    pub fn new(segments: Vec<Name>) -> Self {
        Self { segments }
    }

    pub fn from_dotted(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            segments: text.split('.').map(|seg| Name::new(seg.trim())).collect(),
        }
    }

    #[inline]
    pub fn segments(&self) -> &[Name] {
        &self.segments
    }

    #[inline]
    pub fn last(&self) -> Option<&Name> {
        self.segments.last()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// All segments but the last. The parent of a single-segment name is empty.
    pub fn parent(&self) -> QualifiedName {
        match self.segments.split_last() {
            Some((_, rest)) => Self {
                segments: rest.to_vec(),
            },
            None => Self::default(),
        }
    }

    pub fn push(&mut self, name: Name) {
        self.segments.push(name);
    }

    pub fn to_dotted(&self) -> String {
        self.segments
            .iter()
            .map(Name::as_str)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dotted())
    }
}

/// A package path. The root (default) package has no segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(QualifiedName);

impl PackageName {
    #[inline]
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_dotted(text: &str) -> Self {
        Self(QualifiedName::from_dotted(text))
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_qualified(&self) -> &QualifiedName {
        &self.0
    }

    #[inline]
    pub fn segments(&self) -> &[Name] {
        self.0.segments()
    }

    pub fn to_dotted(&self) -> String {
        self.0.to_dotted()
    }
}

impl From<QualifiedName> for PackageName {
    fn from(value: QualifiedName) -> Self {
        Self(value)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FqNameError {
    #[error("fully-qualified name must not be empty")]
    Empty,
    #[error("fully-qualified name `{input}` contains an empty segment")]
    EmptySegment { input: String },
    #[error("fully-qualified name `{input}` contains invalid character {ch:?}")]
    InvalidCharacter { input: String, ch: char },
}

/// A validated fully-qualified class name with at least one segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FqName {
    path: QualifiedName,
}

impl FqName {
    pub fn parse(text: &str) -> Result<Self, FqNameError> {
        if text.is_empty() {
            return Err(FqNameError::Empty);
        }
        if let Some(ch) = text
            .chars()
            .find(|ch| ch.is_whitespace() || matches!(ch, '*' | '/' | ';' | '`'))
        {
            return Err(FqNameError::InvalidCharacter {
                input: text.to_owned(),
                ch,
            });
        }
        if text.split('.').any(str::is_empty) {
            return Err(FqNameError::EmptySegment {
                input: text.to_owned(),
            });
        }
        Ok(Self {
            path: QualifiedName::from_dotted(text),
        })
    }

    /// Builds an `FqName` from an already-parsed path. Returns `None` for an empty path.
    pub fn from_qualified(path: QualifiedName) -> Option<Self> {
        if path.is_empty() || path.segments().iter().any(|seg| seg.as_str().is_empty()) {
            return None;
        }
        Some(Self { path })
    }

    #[inline]
    pub fn as_qualified(&self) -> &QualifiedName {
        &self.path
    }

    pub fn package(&self) -> PackageName {
        PackageName::from(self.path.parent())
    }

    pub fn simple_name(&self) -> &Name {
        // Construction guarantees at least one segment.
        &self.path.segments()[self.path.len() - 1]
    }

    pub fn to_dotted(&self) -> String {
        self.path.to_dotted()
    }
}

impl fmt::Display for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.path, f)
    }
}

impl TryFrom<String> for FqName {
    type Error = FqNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FqName::parse(&value)
    }
}

impl From<FqName> for String {
    fn from(value: FqName) -> Self {
        value.to_dotted()
    }
}
