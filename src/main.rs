use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox::ast_printer::AstPrinter;
use rox::error::Diagnostics;
use rox::interpreter::Interpreter;
use rox::lox::{self, Lox, Outcome};
use rox::parser::Parser;
use rox::scanner::Scanner;
use rox::token::Token;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a single expression and prints its AST
    Parse { filename: PathBuf },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a Lox program
    Run { filename: PathBuf },

    /// Starts an interactive prompt
    Repl,
}

/// Reads the contents of a file into a String
fn read_file(filename: &PathBuf) -> Result<String> {
    lox::read_source(filename).with_context(|| format!("Failed to read file {:?}", filename))
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // `[module:line] - message`, level from RUST_LOG when set
    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("rox::").unwrap_or(module);
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn tokenize(filename: &PathBuf, json: bool) -> Result<i32> {
    let source = read_file(filename)?;
    let mut diagnostics = Diagnostics::echoing();
    let tokens: Vec<Token> = Scanner::new(&source).scan_tokens(&mut diagnostics);

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }

    Ok(if diagnostics.had_error() { 65 } else { 0 })
}

fn parse(filename: &PathBuf) -> Result<i32> {
    let source = read_file(filename)?;
    let mut diagnostics = Diagnostics::echoing();
    let tokens = Scanner::new(&source).scan_tokens(&mut diagnostics);
    let expr = Parser::new(tokens, &mut diagnostics).parse_expression();

    match expr {
        Some(expr) if !diagnostics.had_error() => {
            let ast_str = AstPrinter.print(&expr);
            debug!("AST: {}", ast_str);
            println!("{}", ast_str);
            Ok(0)
        }
        _ => Ok(65),
    }
}

fn evaluate(filename: &PathBuf) -> Result<i32> {
    let source = read_file(filename)?;
    let mut diagnostics = Diagnostics::echoing();
    let tokens = Scanner::new(&source).scan_tokens(&mut diagnostics);
    let expr = Parser::new(tokens, &mut diagnostics).parse_expression();

    let Some(expr) = expr.filter(|_| !diagnostics.had_error()) else {
        return Ok(65);
    };

    let mut interpreter = Interpreter::new();

    match interpreter.evaluate(&expr) {
        Ok(value) => {
            println!("{}", value);
            Ok(0)
        }
        Err(e) => {
            diagnostics.runtime_error(e);
            Ok(70)
        }
    }
}

fn run(filename: &PathBuf) -> Result<i32> {
    let source = read_file(filename)?;
    let mut lox = Lox::new().echo_diagnostics();

    let outcome = lox.run(&source);
    info!("Run finished: {:?}", outcome);

    Ok(outcome.exit_code())
}

fn repl() -> Result<i32> {
    let mut lox = Lox::new().echo_diagnostics();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };

        let outcome: Outcome = lox.run(&line?);
        debug!("REPL line finished: {:?}", outcome);
    }

    Ok(0)
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let code = match args.commands {
        Commands::Tokenize { filename, json } => tokenize(&filename, json)?,
        Commands::Parse { filename } => parse(&filename)?,
        Commands::Evaluate { filename } => evaluate(&filename)?,
        Commands::Run { filename } => run(&filename)?,
        Commands::Repl => repl()?,
    };

    if code != 0 {
        debug!("Exiting with code {}", code);
        std::process::exit(code);
    }

    Ok(())
}
