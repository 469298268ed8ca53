//! Console entry point: feeds source text through the reader and prints
//! one form per line (or a JSON array with `--json`). Reads the files
//! named on the command line, or stdin when none are given.

use std::io::Read;
use std::process::ExitCode;

use anyhow::Context;
use sexpr_stream::{Parser, Scanner};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut json = false;
    let mut files = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "--help" | "-h" => {
                println!("usage: sexread [--json] [FILE...]");
                println!("Reads S-expression source and prints parsed forms; stdin if no files.");
                return ExitCode::SUCCESS;
            }
            _ => files.push(arg),
        }
    }

    let mut ok = true;
    if files.is_empty() {
        ok = read_input("<stdin>", load_stdin(), json);
    } else {
        for file in &files {
            ok &= read_input(file, load_file(file), json);
        }
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_stdin() -> anyhow::Result<String> {
    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .context("reading stdin")?;
    Ok(source)
}

fn load_file(path: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path))
}

/// Parses one input and prints its forms; diagnostics go to stderr.
/// Returns false if anything failed.
fn read_input(label: &str, source: anyhow::Result<String>, json: bool) -> bool {
    let source = match source {
        Ok(source) => source,
        Err(err) => {
            eprintln!("sexread: {:#}", err);
            return false;
        }
    };

    if json {
        return match sexpr_stream::parse_str(&source, label) {
            Ok(forms) => match serde_json::to_string_pretty(&forms) {
                Ok(out) => {
                    println!("{}", out);
                    true
                }
                Err(err) => {
                    eprintln!("sexread: {:#}", err);
                    false
                }
            },
            Err(err) => {
                eprintln!("{}", err);
                false
            }
        };
    }

    // Streaming path: completed forms print even if a later one fails.
    let mut ok = true;
    for form in Parser::new(Scanner::new(&source, label)) {
        match form {
            Ok(expr) => println!("{}", expr),
            Err(err) => {
                eprintln!("{}", err);
                ok = false;
            }
        }
    }
    ok
}
