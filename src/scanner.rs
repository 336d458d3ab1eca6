//! Lexer for Lox source text.
//!
//! [`Scanner`] is an iterator of `Result<Token>`: a bad character or an
//! unterminated string yields one `Err` and scanning resumes right after it,
//! so a single pass reports every lexical error.  The last item is always
//! exactly one `EOF` token, after which the iterator is fused.
//!
//! Lexing works on the byte view of the source.  Every byte that can start a
//! token is ASCII; anything else is reported as `Unexpected character.` once
//! per `char`, never once per byte.
//!
//! Strings may span lines and have no escapes.  Numbers are `digits` with an
//! optional `.digits`; a leading `-` is always a separate `MINUS`, and
//! neither `.5` nor `5.` is one number.

use crate::error::{Diagnostics, LoxError, Result};
use crate::token::{Token, TokenType};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "and"    => TokenType::AND,
    "class"  => TokenType::CLASS,
    "else"   => TokenType::ELSE,
    "false"  => TokenType::FALSE,
    "fun"    => TokenType::FUN,
    "for"    => TokenType::FOR,
    "if"     => TokenType::IF,
    "nil"    => TokenType::NIL,
    "or"     => TokenType::OR,
    "print"  => TokenType::PRINT,
    "return" => TokenType::RETURN,
    "super"  => TokenType::SUPER,
    "this"   => TokenType::THIS,
    "true"   => TokenType::TRUE,
    "var"    => TokenType::VAR,
    "while"  => TokenType::WHILE,
};

pub struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    /// First byte of the lexeme being scanned.
    start: usize,
    /// Next byte to look at.
    pos: usize,
    line: usize,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        info!("Scanner created over {} bytes", source.len());

        Self {
            source,
            bytes: source.as_bytes(),
            start: 0,
            pos: 0,
            line: 1,
            finished: false,
        }
    }

    /// Drain the scanner.  Errors go to `diagnostics`; the tokens always end
    /// with `EOF`.
    pub fn scan_tokens(self, diagnostics: &mut Diagnostics) -> Vec<Token> {
        let tokens: Vec<Token> = self
            .filter_map(|item| item.map_err(|e| diagnostics.report(e)).ok())
            .collect();

        info!("Scanned {} tokens", tokens.len());
        tokens
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> u8 {
        let b = self.bytes[self.pos];
        self.pos += 1;
        b
    }

    fn bump_if(&mut self, expected: u8) -> bool {
        let hit = self.peek_at(0) == Some(expected);
        if hit {
            self.pos += 1;
        }
        hit
    }

    /// `long` if the next byte is `=`, otherwise `short`.
    fn with_equals(&mut self, long: TokenType, short: TokenType) -> TokenType {
        if self.bump_if(b'=') {
            long
        } else {
            short
        }
    }

    fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.pos]
    }

    fn token(&self, kind: TokenType) -> Token {
        Token::new(kind, self.lexeme(), self.line)
    }

    /// Whitespace, newlines and `//` comments.
    fn skip_trivia(&mut self) {
        while let Some(b) = self.peek_at(0) {
            match b {
                b' ' | b'\r' | b'\t' => self.pos += 1,
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b'/' if self.peek_at(1) == Some(b'/') => {
                    // stop on the newline so the line count sees it
                    self.pos = memchr(b'\n', &self.bytes[self.pos..])
                        .map_or(self.bytes.len(), |offset| self.pos + offset);
                }
                _ => return,
            }
        }
    }

    fn scan_token(&mut self) -> Result<Token> {
        use TokenType::*;

        let kind = match self.bump() {
            b'(' => LEFT_PAREN,
            b')' => RIGHT_PAREN,
            b'{' => LEFT_BRACE,
            b'}' => RIGHT_BRACE,
            b',' => COMMA,
            b'.' => DOT,
            b'-' => MINUS,
            b'+' => PLUS,
            b';' => SEMICOLON,
            b'*' => STAR,
            b'/' => SLASH,
            b'!' => self.with_equals(BANG_EQUAL, BANG),
            b'=' => self.with_equals(EQUAL_EQUAL, EQUAL),
            b'<' => self.with_equals(LESS_EQUAL, LESS),
            b'>' => self.with_equals(GREATER_EQUAL, GREATER),
            b'"' => self.string()?,
            b'0'..=b'9' => self.number(),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(),
            other => {
                if !other.is_ascii() {
                    // resume on the next char boundary
                    let width = self.source[self.start..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
                    self.pos = self.start + width;
                }

                debug!("Unexpected {:?} on line {}", self.lexeme(), self.line);
                return Err(LoxError::lex(self.line, "Unexpected character."));
            }
        };

        Ok(self.token(kind))
    }

    fn string(&mut self) -> Result<TokenType> {
        let Some(len) = memchr(b'"', &self.bytes[self.pos..]) else {
            self.line += self.bytes[self.pos..].iter().filter(|&&b| b == b'\n').count();
            self.pos = self.bytes.len();
            return Err(LoxError::lex(self.line, "Unterminated string."));
        };

        let body = &self.source[self.pos..self.pos + len];
        self.line += body.bytes().filter(|&b| b == b'\n').count();
        self.pos += len + 1;

        Ok(TokenType::STRING(body.to_owned()))
    }

    fn skip_digits(&mut self) {
        while self.peek_at(0).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn number(&mut self) -> TokenType {
        self.skip_digits();

        let has_fraction = self.peek_at(0) == Some(b'.')
            && self.peek_at(1).is_some_and(|b| b.is_ascii_digit());

        if has_fraction {
            self.pos += 1;
            self.skip_digits();
        }

        // only digits and at most one inner dot were consumed
        TokenType::NUMBER(self.lexeme().parse().unwrap_or_default())
    }

    fn identifier(&mut self) -> TokenType {
        while self
            .peek_at(0)
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.pos += 1;
        }

        KEYWORDS
            .get(self.lexeme())
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.skip_trivia();
        self.start = self.pos;

        if self.pos >= self.bytes.len() {
            self.finished = true;
            return Some(Ok(self.token(TokenType::EOF)));
        }

        Some(self.scan_token())
    }
}

impl FusedIterator for Scanner<'_> {}
