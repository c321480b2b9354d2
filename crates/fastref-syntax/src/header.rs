//! File header parsing: `package` and `import` directives.

use fastref_core::{Name, QualifiedName, TextRange};
use serde::Serialize;

use crate::lexer::{lex, Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportDecl {
    /// For star imports this is the imported package (without the `.*`).
    pub path: QualifiedName,
    pub alias: Option<Name>,
    pub is_star: bool,
    #[serde(skip)]
    pub range: TextRange,
}

impl ImportDecl {
    /// The simple name this import brings into scope, if any.
    pub fn bound_name(&self) -> Option<&Name> {
        if self.is_star {
            return None;
        }
        self.alias.as_ref().or_else(|| self.path.last())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    pub package: Option<QualifiedName>,
    pub imports: Vec<ImportDecl>,
}

pub fn parse_header(source: &str) -> FileHeader {
    let tokens = lex(source);
    parse_header_tokens(source, &tokens).0
}

/// Parses the header and returns it together with the index of the first token
/// after it.
pub(crate) fn parse_header_tokens(source: &str, tokens: &[Token]) -> (FileHeader, usize) {
    let mut p = HeaderParser {
        source,
        tokens,
        pos: 0,
    };
    let mut header = FileHeader::default();

    p.skip_separators();
    while p.at(TokenKind::At) && p.file_annotation() {
        p.skip_separators();
    }

    if p.at_keyword("package") {
        p.pos += 1;
        let path = p.dotted_path();
        if !path.is_empty() {
            header.package = Some(path);
        }
        p.skip_separators();
    }

    while p.at_keyword("import") {
        let start = p.tokens[p.pos].range.start();
        p.pos += 1;
        if let Some(mut import) = p.import_body() {
            let end = p.tokens[p.pos.saturating_sub(1)].range.end();
            import.range = TextRange::new(start, end);
            header.imports.push(import);
        }
        p.skip_separators();
    }

    (header, p.pos)
}

struct HeaderParser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl HeaderParser<'_> {
    fn kind(&self, pos: usize) -> Option<TokenKind> {
        self.tokens.get(pos).map(|tok| tok.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.kind(self.pos) == Some(kind)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.tokens
            .get(self.pos)
            .is_some_and(|tok| tok.is_ident(self.source, keyword))
    }

    fn skip_separators(&mut self) {
        while matches!(
            self.kind(self.pos),
            Some(TokenKind::Newline | TokenKind::Semicolon)
        ) {
            self.pos += 1;
        }
    }

    fn ident(&mut self) -> Option<Name> {
        let tok = self.tokens.get(self.pos)?;
        if tok.kind != TokenKind::Ident {
            return None;
        }
        self.pos += 1;
        Some(Name::new(tok.text(self.source)))
    }

    /// `a.b.c`; stops before a `.*`.
    fn dotted_path(&mut self) -> QualifiedName {
        let mut path = QualifiedName::default();
        let Some(first) = self.ident() else {
            return path;
        };
        path.push(first);
        while self.at(TokenKind::Dot) && self.kind(self.pos + 1) == Some(TokenKind::Ident) {
            self.pos += 1;
            if let Some(seg) = self.ident() {
                path.push(seg);
            }
        }
        path
    }

    fn import_body(&mut self) -> Option<ImportDecl> {
        let path = self.dotted_path();
        if path.is_empty() {
            self.skip_line();
            return None;
        }

        if self.at(TokenKind::Dot) && self.kind(self.pos + 1) == Some(TokenKind::Star) {
            self.pos += 2;
            return Some(ImportDecl {
                path,
                alias: None,
                is_star: true,
                range: TextRange::default(),
            });
        }

        let mut alias = None;
        if self.at_keyword("as") {
            self.pos += 1;
            alias = self.ident();
        }

        Some(ImportDecl {
            path,
            alias,
            is_star: false,
            range: TextRange::default(),
        })
    }

    fn skip_line(&mut self) {
        while let Some(kind) = self.kind(self.pos) {
            if matches!(kind, TokenKind::Newline | TokenKind::Semicolon) {
                break;
            }
            self.pos += 1;
        }
    }

    /// `@file:Name(...)` or `@file:[A B(...)]`. Returns `false` (without consuming)
    /// for annotations that are not file annotations.
    fn file_annotation(&mut self) -> bool {
        let is_file_target = self
            .tokens
            .get(self.pos + 1)
            .is_some_and(|tok| tok.is_ident(self.source, "file"))
            && self.kind(self.pos + 2) == Some(TokenKind::Colon);
        if !is_file_target {
            return false;
        }
        self.pos += 3;

        if self.at(TokenKind::LBracket) {
            self.pos = skip_balanced(self.tokens, self.pos, TokenKind::LBracket, TokenKind::RBracket);
            return true;
        }

        self.dotted_path();
        if self.at(TokenKind::LParen) {
            self.pos = skip_balanced(self.tokens, self.pos, TokenKind::LParen, TokenKind::RParen);
        }
        true
    }
}

/// Given `pos` pointing at `open`, returns the index just past the matching `close`
/// (or the end of input if unbalanced).
pub(crate) fn skip_balanced(tokens: &[Token], pos: usize, open: TokenKind, close: TokenKind) -> usize {
    let mut depth = 0usize;
    let mut i = pos;
    while let Some(tok) = tokens.get(i) {
        if tok.kind == open {
            depth += 1;
        } else if tok.kind == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return i + 1;
            }
        }
        i += 1;
    }
    tokens.len()
}
