use fastref_core::{Name, QualifiedName};
use fastref_syntax::{ReferenceKind, TypeReference};
use serde::Serialize;
use thiserror::Error;

/// Syntactic position of a reference occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceRole {
    /// Type name of an annotation application.
    AnnotationEntry,
    /// Type name of a supertype constructor call in a class or object header.
    SupertypeEntry,
    Other,
}

impl From<ReferenceKind> for ReferenceRole {
    fn from(kind: ReferenceKind) -> Self {
        match kind {
            ReferenceKind::Annotation => ReferenceRole::AnnotationEntry,
            ReferenceKind::SuperTypeCall => ReferenceRole::SupertypeEntry,
            ReferenceKind::Other => ReferenceRole::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactsError {
    #[error("reference text must not be empty")]
    EmptyName,
    #[error("reference text `{0}` must be a single identifier")]
    NotAnIdentifier(String),
    #[error("explicit qualifier must have at least one non-empty segment")]
    EmptyQualifier,
}

/// What the syntax layer knows about one reference occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFacts {
    written_text: Name,
    role: ReferenceRole,
    qualifier: Option<QualifiedName>,
}

impl ReferenceFacts {
    pub fn new(
        written_text: Name,
        role: ReferenceRole,
        qualifier: Option<QualifiedName>,
    ) -> Result<Self, FactsError> {
        let text = written_text.as_str();
        if text.is_empty() {
            return Err(FactsError::EmptyName);
        }
        if text.contains(['.', '@', '(', ')']) || text.contains(char::is_whitespace) {
            return Err(FactsError::NotAnIdentifier(text.to_owned()));
        }
        if let Some(qualifier) = &qualifier {
            if qualifier.is_empty() || qualifier.segments().iter().any(|s| s.as_str().is_empty())
            {
                return Err(FactsError::EmptyQualifier);
            }
        }
        Ok(Self {
            written_text,
            role,
            qualifier,
        })
    }

    /// Splits dotted text such as `org.junit.Test` into qualifier and name.
    pub fn from_dotted(text: &str, role: ReferenceRole) -> Result<Self, FactsError> {
        match text.rsplit_once('.') {
            Some((qualifier, name)) => Self::new(
                Name::new(name),
                role,
                Some(QualifiedName::from_dotted(qualifier)),
            ),
            None => Self::new(Name::new(text), role, None),
        }
    }

    pub fn annotation(text: &str) -> Result<Self, FactsError> {
        Self::from_dotted(text, ReferenceRole::AnnotationEntry)
    }

    pub fn supertype(text: &str) -> Result<Self, FactsError> {
        Self::from_dotted(text, ReferenceRole::SupertypeEntry)
    }

    pub fn other(text: &str) -> Result<Self, FactsError> {
        Self::from_dotted(text, ReferenceRole::Other)
    }

    #[inline]
    pub fn written_text(&self) -> &Name {
        &self.written_text
    }

    #[inline]
    pub fn role(&self) -> ReferenceRole {
        self.role
    }

    #[inline]
    pub fn qualifier(&self) -> Option<&QualifiedName> {
        self.qualifier.as_ref()
    }
}

impl TryFrom<&TypeReference> for ReferenceFacts {
    type Error = FactsError;

    fn try_from(reference: &TypeReference) -> Result<Self, Self::Error> {
        ReferenceFacts::new(
            reference.name.clone(),
            reference.kind.into(),
            reference.qualifier.clone(),
        )
    }
}
