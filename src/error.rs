//! Centralised error hierarchy for the **Lox interpreter**.
//!
//! All subsystems (scanner, parser, resolver, runtime, CLI) convert their
//! internal failure modes into one of the variants defined here.  Errors are
//! plain data: the scanner, parser and resolver hand them to a
//! [`Diagnostics`] collector instead of flipping process‑wide flags, and the
//! interpreter returns a [`RuntimeError`] up the call chain.
//!
//! The module **does not** decide exit codes; see [`crate::lox::Outcome`].

use std::io;
use thiserror::Error;

use log::{debug, info};

use crate::token::{Token, TokenType};

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.  `at` is ` at 'lexeme'` or ` at end`.
    #[error("[line {line}] Error{at}: {message}")]
    Parse {
        message: String,
        at: String,
        line: usize,
    },

    /// Static‑analysis failure (scoping, illegal `return`/`this`/`super`).
    #[error("[line {line}] Error{at}: {message}")]
    Resolve {
        message: String,
        at: String,
        line: usize,
    },

    /// Runtime evaluation error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Where a token‑located error points: ` at end` for EOF, otherwise the lexeme.
fn location(token: &Token) -> String {
    if token.token_type == TokenType::EOF {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Parse error: line={}, msg={}", token.line, message);

        LoxError::Parse {
            message,
            at: location(token),
            line: token.line,
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Resolve error: line={}, msg={}", token.line, message);

        LoxError::Resolve {
            message,
            at: location(token),
            line: token.line,
        }
    }
}

/// An error raised while evaluating the program.  Carries the token closest
/// to the fault so the report can name its line.
#[derive(Debug, Clone, Error)]
#[error("{message}\n[line {}]", .token.line)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Runtime error: line={}, msg={}", token.line, message);

        RuntimeError {
            token: token.clone(),
            message,
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;

/// Collector for everything the pipeline reports.
///
/// The scanner, parser and resolver keep going after an error so a single
/// run surfaces as many problems as possible; the driver only asks
/// [`had_error`](Self::had_error) before letting the interpreter start.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<LoxError>,
    had_runtime_error: bool,
    echo: bool,
}

impl Diagnostics {
    /// Silent collector; reports are only recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collector that also writes every report to standard error as it arrives.
    pub fn echoing() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    pub fn report(&mut self, error: LoxError) {
        info!("Reported: {}", error);

        if self.echo {
            eprintln!("{}", error);
        }

        self.errors.push(error);
    }

    pub fn runtime_error(&mut self, error: RuntimeError) {
        self.had_runtime_error = true;
        self.report(LoxError::Runtime(error));
    }

    /// `true` once any lexical, syntax or resolution error has been reported.
    pub fn had_error(&self) -> bool {
        self.errors
            .iter()
            .any(|e| !matches!(e, LoxError::Runtime(_)))
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn errors(&self) -> &[LoxError] {
        &self.errors
    }

    /// Forget everything reported so far (the REPL does this between lines).
    pub fn reset(&mut self) {
        self.errors.clear();
        self.had_runtime_error = false;
    }
}
