//! Program entry contract: scanner → parser → resolver → interpreter.
//!
//! Static errors from any of the first three stages keep the interpreter
//! from running at all; the first runtime error stops the program.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use log::info;

use crate::error::{Diagnostics, Result};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;

/// Result of running one piece of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    /// Lexical, syntax or resolution error; nothing was executed.
    StaticError,
    RuntimeError,
}

impl Outcome {
    /// Process exit status for the CLI (sysexits `EX_DATAERR` / `EX_SOFTWARE`).
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Ok => 0,
            Outcome::StaticError => 65,
            Outcome::RuntimeError => 70,
        }
    }
}

/// A long‑lived session.  Globals survive between [`run`](Self::run) calls,
/// which is what the REPL relies on.
pub struct Lox {
    interpreter: Interpreter,
    diagnostics: Diagnostics,
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lox {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Session whose `print` output goes to `out` instead of stdout.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::with_output(out),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Echo every diagnostic to stderr as it is reported.
    pub fn echo_diagnostics(mut self) -> Self {
        self.diagnostics = Diagnostics::echoing();
        self
    }

    /// Reports from the most recent [`run`](Self::run).
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn run(&mut self, source: &str) -> Outcome {
        self.diagnostics.reset();

        let tokens = Scanner::new(source).scan_tokens(&mut self.diagnostics);
        let statements = Parser::new(tokens, &mut self.diagnostics).parse();

        if self.diagnostics.had_error() {
            info!("Parse phase reported errors; not running");
            return Outcome::StaticError;
        }

        Resolver::new(&mut self.interpreter, &mut self.diagnostics).resolve(&statements);

        if self.diagnostics.had_error() {
            info!("Resolve phase reported errors; not running");
            return Outcome::StaticError;
        }

        match self.interpreter.interpret(&statements) {
            Ok(()) => Outcome::Ok,
            Err(e) => {
                self.diagnostics.runtime_error(e);
                Outcome::RuntimeError
            }
        }
    }
}

/// Loads a source file.  Fails with [`LoxError::Io`](crate::error::LoxError::Io)
/// when the file cannot be read and
/// [`LoxError::Utf8`](crate::error::LoxError::Utf8) when it is not UTF-8.
pub fn read_source(path: &Path) -> Result<String> {
    info!("Reading file: {:?}", path);

    let mut reader = BufReader::new(File::open(path)?);
    let mut buf = Vec::new();
    let bytes = reader.read_to_end(&mut buf)?;

    info!("Read {} bytes from {:?}", bytes, path);

    Ok(String::from_utf8(buf)?)
}
