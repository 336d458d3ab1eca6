#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::error::Diagnostics;
use rox::interpreter::Interpreter;
use rox::lox::{Lox, Outcome};
use rox::parser::Parser;
use rox::resolver::Resolver;
use rox::scanner::Scanner;
use rox::stmt::Stmt;

/// `Write` sink the test keeps a handle to after giving it to the interpreter.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct RunResult {
    pub outcome: Outcome,
    pub output: String,
    pub errors: Vec<String>,
}

impl RunResult {
    pub fn lines(&self) -> Vec<&str> {
        self.output.lines().collect()
    }
}

/// Run a whole program in a fresh session.
pub fn run(source: &str) -> RunResult {
    let buffer = SharedBuffer::default();
    let mut lox = Lox::with_output(Box::new(buffer.clone()));

    let outcome = lox.run(source);

    RunResult {
        outcome,
        output: buffer.contents(),
        errors: lox
            .diagnostics()
            .errors()
            .iter()
            .map(|e| e.to_string())
            .collect(),
    }
}

/// Scan, parse and resolve without executing.
pub fn resolve(source: &str) -> (Vec<Stmt>, Interpreter, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
    let statements = Parser::new(tokens, &mut diagnostics).parse();

    let mut interpreter = Interpreter::with_output(Box::new(io::sink()));
    Resolver::new(&mut interpreter, &mut diagnostics).resolve(&statements);

    (statements, interpreter, diagnostics)
}

/// Parse a program, returning the statements and the rendered errors.
pub fn parse(source: &str) -> (Vec<Stmt>, Vec<String>) {
    let mut diagnostics = Diagnostics::new();
    let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
    let statements = Parser::new(tokens, &mut diagnostics).parse();

    let errors = diagnostics.errors().iter().map(|e| e.to_string()).collect();
    (statements, errors)
}
