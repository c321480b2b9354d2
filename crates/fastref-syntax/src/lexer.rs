//! A small Kotlin lexer.
//!
//! Only the tokens needed to recover file headers, annotation entries and class
//! headers are distinguished. Comments, string/char literals, a leading `#!` line and
//! whitespace other than newlines are dropped; anything else collapses into
//! [`TokenKind::Other`].
//!
//! Offsets are [`TextSize`]; lexing stops at the first token that does not fit.

use fastref_core::{TextRange, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    At,
    Dot,
    Comma,
    Colon,
    ColonColon,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LAngle,
    RAngle,
    Star,
    Newline,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// For back-ticked identifiers this excludes the back-ticks.
    pub range: TextRange,
}

impl Token {
    #[inline]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range]
    }

    #[inline]
    pub fn is_ident(&self, source: &str, text: &str) -> bool {
        self.kind == TokenKind::Ident && self.text(source) == text
    }
}

pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut lexer = Self { source, pos: 0 };
        if source.starts_with("#!") {
            lexer.skip_line_comment();
        }
        lexer
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn token(&self, kind: TokenKind, start: usize, end: usize) -> Option<Token> {
        let start = TextSize::try_from(start).ok()?;
        let end = TextSize::try_from(end).ok()?;
        Some(Token {
            kind,
            range: TextRange::new(start, end),
        })
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            self.bump();
        }
    }

    /// Kotlin block comments nest.
    fn skip_block_comment(&mut self) {
        self.pos += 2;
        let mut depth = 1usize;
        while depth > 0 {
            match (self.peek(), self.peek_nth(1)) {
                (Some('/'), Some('*')) => {
                    self.pos += 2;
                    depth += 1;
                }
                (Some('*'), Some('/')) => {
                    self.pos += 2;
                    depth -= 1;
                }
                (Some(_), _) => {
                    self.bump();
                }
                (None, _) => break,
            }
        }
    }

    fn skip_string(&mut self) {
        if self.source[self.pos..].starts_with("\"\"\"") {
            self.pos += 3;
            match self.source[self.pos..].find("\"\"\"") {
                Some(end) => {
                    self.pos += end + 3;
                    // Raw strings may end with extra quotes: `""""""` etc.
                    while self.peek() == Some('"') {
                        self.bump();
                    }
                }
                None => self.pos = self.source.len(),
            }
            return;
        }

        self.bump();
        while let Some(ch) = self.bump() {
            match ch {
                '\\' => {
                    self.bump();
                }
                '"' | '\n' => break,
                _ => {}
            }
        }
    }

    fn skip_char_literal(&mut self) {
        self.bump();
        while let Some(ch) = self.bump() {
            match ch {
                '\\' => {
                    self.bump();
                }
                '\'' | '\n' => break,
                _ => {}
            }
        }
    }

    fn ident(&mut self, start: usize) -> Option<Token> {
        while let Some(ch) = self.peek() {
            if ch == '_' || unicode_ident::is_xid_continue(ch) {
                self.bump();
            } else {
                break;
            }
        }
        self.token(TokenKind::Ident, start, self.pos)
    }

    fn backticked_ident(&mut self, start: usize) -> Option<Token> {
        self.bump();
        let inner_start = self.pos;
        while let Some(ch) = self.peek() {
            if ch == '`' || ch == '\n' {
                break;
            }
            self.bump();
        }
        let inner_end = self.pos;
        if self.peek() == Some('`') {
            self.bump();
            self.token(TokenKind::Ident, inner_start, inner_end)
        } else {
            self.token(TokenKind::Other, start, inner_end)
        }
    }

    fn number(&mut self, start: usize) -> Option<Token> {
        while let Some(ch) = self.peek() {
            let continues = ch.is_ascii_alphanumeric()
                || ch == '_'
                || (ch == '.' && self.peek_nth(1).is_some_and(|next| next.is_ascii_digit()));
            if !continues {
                break;
            }
            self.bump();
        }
        self.token(TokenKind::Other, start, self.pos)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let start = self.pos;
            let ch = self.peek()?;

            let kind = match ch {
                '\n' => {
                    self.bump();
                    TokenKind::Newline
                }
                '\r' => {
                    self.bump();
                    if self.peek() == Some('\n') {
                        self.bump();
                    }
                    TokenKind::Newline
                }
                c if c.is_whitespace() => {
                    self.bump();
                    continue;
                }
                '/' if self.peek_nth(1) == Some('/') => {
                    self.skip_line_comment();
                    continue;
                }
                '/' if self.peek_nth(1) == Some('*') => {
                    self.skip_block_comment();
                    continue;
                }
                '"' => {
                    self.skip_string();
                    continue;
                }
                '\'' => {
                    self.skip_char_literal();
                    continue;
                }
                '`' => return self.backticked_ident(start),
                c if c == '_' || unicode_ident::is_xid_start(c) => return self.ident(start),
                c if c.is_ascii_digit() => return self.number(start),
                ':' if self.peek_nth(1) == Some(':') => {
                    self.pos += 2;
                    TokenKind::ColonColon
                }
                _ => {
                    self.bump();
                    match ch {
                        '@' => TokenKind::At,
                        '.' => TokenKind::Dot,
                        ',' => TokenKind::Comma,
                        ':' => TokenKind::Colon,
                        ';' => TokenKind::Semicolon,
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '{' => TokenKind::LBrace,
                        '}' => TokenKind::RBrace,
                        '[' => TokenKind::LBracket,
                        ']' => TokenKind::RBracket,
                        '<' => TokenKind::LAngle,
                        '>' => TokenKind::RAngle,
                        '*' => TokenKind::Star,
                        _ => TokenKind::Other,
                    }
                }
            };

            return self.token(kind, start, self.pos);
        }
    }
}
