//! Finding candidate type references and classifying their syntactic position.
//!
//! Classification is purely token based. Two positions are recognised:
//!
//! - the type name of an annotation entry: `@Test`, `@org.junit.Test(...)`, `@get:Test`,
//!   `@field:[Test Other]`;
//! - the type name of a supertype constructor call in a class or object header:
//!   `class A : Test()`, `object : Base<T>(x)`.
//!
//! Every other occurrence is reported as [`ReferenceKind::Other`]. That includes label
//! names (`return@Test`, `this@Test`, `Test@{ ... }`), whose `@` touches the preceding
//! identifier.

use std::collections::HashMap;

use fastref_core::{Name, QualifiedName, TextRange};
use serde::Serialize;

use crate::header::{parse_header_tokens, skip_balanced};
use crate::lexer::{lex, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Annotation,
    SuperTypeCall,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference {
    pub name: Name,
    /// Segments written before the name (`org.junit` in `@org.junit.Test`).
    pub qualifier: Option<QualifiedName>,
    pub kind: ReferenceKind,
    pub range: TextRange,
}

const CLASS_HEADER_MODIFIERS: &[&str] = &["constructor", "private", "protected", "internal", "public"];

/// Returns every identifier after the file header whose text is one of `names`.
pub fn find_type_references(source: &str, names: &[Name]) -> Vec<TypeReference> {
    let tokens = lex(source);
    let (_, body_start) = parse_header_tokens(source, &tokens);
    let roles = classify(source, &tokens, body_start);

    let mut out = Vec::new();
    for (idx, tok) in tokens.iter().enumerate().skip(body_start) {
        if tok.kind != TokenKind::Ident {
            continue;
        }
        let text = tok.text(source);
        if !names.iter().any(|name| name == text) {
            continue;
        }

        let kind = roles.get(&idx).copied().unwrap_or(ReferenceKind::Other);
        tracing::trace!(target: "fastref.syntax", name = text, ?kind, "candidate occurrence");
        out.push(TypeReference {
            name: Name::new(text),
            qualifier: qualifier_before(source, &tokens, idx),
            kind,
            range: tok.range,
        });
    }
    out
}

fn qualifier_before(source: &str, tokens: &[Token], idx: usize) -> Option<QualifiedName> {
    let mut segments = Vec::new();
    let mut i = idx;
    while i >= 2 && tokens[i - 1].kind == TokenKind::Dot && tokens[i - 2].kind == TokenKind::Ident {
        segments.push(Name::new(tokens[i - 2].text(source)));
        i -= 2;
    }
    if segments.is_empty() {
        return None;
    }
    segments.reverse();
    Some(QualifiedName::new(segments))
}

/// Maps token indices of annotation / supertype-call type names to their role.
fn classify(source: &str, tokens: &[Token], start: usize) -> HashMap<usize, ReferenceKind> {
    let mut roles = HashMap::new();
    let mut i = start;
    while i < tokens.len() {
        let tok = &tokens[i];
        match tok.kind {
            TokenKind::At if is_label_at(tokens, i) => {}
            TokenKind::At => {
                i = annotation(tokens, i, &mut roles);
                continue;
            }
            TokenKind::Ident
                if matches!(tok.text(source), "class" | "interface" | "object")
                    && !(i > 0 && tokens[i - 1].kind == TokenKind::ColonColon) =>
            {
                if let Some(list_start) = supertype_list_start(source, tokens, i) {
                    supertype_calls(source, tokens, list_start, &mut roles);
                }
            }
            _ => {}
        }
        i += 1;
    }
    roles
}

/// `return@l`, `this@l`, `l@{`: the `@` of a label is glued to an identifier.
fn is_label_at(tokens: &[Token], at: usize) -> bool {
    at > 0
        && tokens[at - 1].kind == TokenKind::Ident
        && tokens[at - 1].range.end() == tokens[at].range.start()
}

/// Records the annotation at `at` and returns the index just past its type name.
/// Arguments are left for the main walk so references inside them are still seen.
fn annotation(tokens: &[Token], at: usize, roles: &mut HashMap<usize, ReferenceKind>) -> usize {
    let mut i = at + 1;
    let kind_at = |i: usize| tokens.get(i).map(|tok| tok.kind);

    // Use-site target: `@get:Test`, `@field:[A B]`.
    if kind_at(i) == Some(TokenKind::Ident) && kind_at(i + 1) == Some(TokenKind::Colon) {
        i += 2;
    }

    if kind_at(i) == Some(TokenKind::LBracket) {
        i += 1;
        while let Some(kind) = kind_at(i) {
            match kind {
                TokenKind::RBracket => return i + 1,
                TokenKind::Ident => {
                    let (last, next) = dotted_name_end(tokens, i);
                    roles.insert(last, ReferenceKind::Annotation);
                    i = next;
                    if kind_at(i) == Some(TokenKind::LParen) {
                        i = skip_balanced(tokens, i, TokenKind::LParen, TokenKind::RParen);
                    }
                }
                _ => i += 1,
            }
        }
        return i;
    }

    if kind_at(i) == Some(TokenKind::Ident) {
        let (last, next) = dotted_name_end(tokens, i);
        roles.insert(last, ReferenceKind::Annotation);
        return next;
    }
    i
}

/// For a dotted name starting at `first`, returns `(index of last segment, index after it)`.
fn dotted_name_end(tokens: &[Token], first: usize) -> (usize, usize) {
    let mut last = first;
    while tokens.get(last + 1).map(|t| t.kind) == Some(TokenKind::Dot)
        && tokens.get(last + 2).map(|t| t.kind) == Some(TokenKind::Ident)
    {
        last += 2;
    }
    (last, last + 1)
}

/// Looks past the name, type parameters, and primary constructor of a class header.
/// Returns the index of the first token after the supertype `:`.
fn supertype_list_start(source: &str, tokens: &[Token], keyword: usize) -> Option<usize> {
    let mut i = keyword + 1;
    let kind_at = |i: usize| tokens.get(i).map(|tok| tok.kind);

    while kind_at(i) == Some(TokenKind::Newline) {
        i += 1;
    }
    if kind_at(i) == Some(TokenKind::Ident)
        && !CLASS_HEADER_MODIFIERS.contains(&tokens[i].text(source))
    {
        i += 1;
    }

    loop {
        match kind_at(i)? {
            TokenKind::Newline => i += 1,
            TokenKind::LAngle => i = skip_balanced(tokens, i, TokenKind::LAngle, TokenKind::RAngle),
            TokenKind::LParen => i = skip_balanced(tokens, i, TokenKind::LParen, TokenKind::RParen),
            TokenKind::At => {
                i += 1;
                if kind_at(i) == Some(TokenKind::Ident) {
                    i = dotted_name_end(tokens, i).1;
                }
                if kind_at(i) == Some(TokenKind::LParen) {
                    i = skip_balanced(tokens, i, TokenKind::LParen, TokenKind::RParen);
                }
            }
            TokenKind::Ident if CLASS_HEADER_MODIFIERS.contains(&tokens[i].text(source)) => i += 1,
            TokenKind::Colon => return Some(i + 1),
            _ => return None,
        }
    }
}

fn supertype_calls(
    source: &str,
    tokens: &[Token],
    mut i: usize,
    roles: &mut HashMap<usize, ReferenceKind>,
) {
    let kind_at = |i: usize| tokens.get(i).map(|tok| tok.kind);

    loop {
        while kind_at(i) == Some(TokenKind::Newline) {
            i += 1;
        }
        if kind_at(i) != Some(TokenKind::Ident) {
            return;
        }
        let (last, mut next) = dotted_name_end(tokens, i);
        if kind_at(next) == Some(TokenKind::LAngle) {
            next = skip_balanced(tokens, next, TokenKind::LAngle, TokenKind::RAngle);
        }
        if kind_at(next) == Some(TokenKind::LParen) {
            roles.insert(last, ReferenceKind::SuperTypeCall);
            next = skip_balanced(tokens, next, TokenKind::LParen, TokenKind::RParen);
        }

        // Delegation: `Base by impl`
        if tokens.get(next).is_some_and(|tok| tok.is_ident(source, "by")) {
            while let Some(kind) = kind_at(next) {
                match kind {
                    TokenKind::Comma | TokenKind::LBrace | TokenKind::Newline => break,
                    TokenKind::LParen => {
                        next = skip_balanced(tokens, next, TokenKind::LParen, TokenKind::RParen)
                    }
                    _ => next += 1,
                }
            }
        }

        while kind_at(next) == Some(TokenKind::Newline) {
            next += 1;
        }
        if kind_at(next) != Some(TokenKind::Comma) {
            return;
        }
        i = next + 1;
    }
}
