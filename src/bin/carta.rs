//! Command-line interface for carta
//! This binary is used to check / inspect / convert carta documents.
//!
//! Usage:
//!   carta check `<path>`                      - Parse a document and report errors
//!   carta show `<path>` [--format `<format>`] - Print a document as JSON or re-rendered source
//!   carta tokens `<path>`                     - Dump the token stream

use clap::{Arg, Command};

use carta::model::render;
use carta::parsing::lexer::tokenize;

fn main() {
    let matches = Command::new("carta")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for checking and inspecting carta documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("check")
                .about("Parse a document and report errors")
                .arg(
                    Arg::new("path")
                        .help("Path to the carta document")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Print a document's value tree")
                .arg(
                    Arg::new("path")
                        .help("Path to the carta document")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('json', 'carta')")
                        .default_value("json"),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Dump the token stream")
                .arg(
                    Arg::new("path")
                        .help("Path to the carta document")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("check", check_matches)) => {
            let path = check_matches.get_one::<String>("path").unwrap();
            handle_check_command(path);
        }
        Some(("show", show_matches)) => {
            let path = show_matches.get_one::<String>("path").unwrap();
            let format = show_matches.get_one::<String>("format").unwrap();
            handle_show_command(path, format);
        }
        Some(("tokens", tokens_matches)) => {
            let path = tokens_matches.get_one::<String>("path").unwrap();
            handle_tokens_command(path);
        }
        _ => unreachable!(),
    }
}

fn read_source(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    })
}

/// Handle the check command
fn handle_check_command(path: &str) {
    let source = read_source(path);
    match carta::parse(&source) {
        Ok(Some(_)) => println!("{}: ok", path),
        Ok(None) => println!("{}: ok (empty document)", path),
        Err(e) => {
            eprintln!("{}: {}", path, e);
            std::process::exit(1);
        }
    }
}

/// Handle the show command
fn handle_show_command(path: &str, format: &str) {
    let source = read_source(path);
    let node = match carta::parse(&source) {
        Ok(Some(node)) => node,
        Ok(None) => {
            // An empty document shows as an empty object either way.
            match format {
                "json" => println!("{{}}"),
                _ => {}
            }
            return;
        }
        Err(e) => {
            eprintln!("{}: {}", path, e);
            std::process::exit(1);
        }
    };

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&node).unwrap_or_else(|e| {
                eprintln!("Serialization error: {}", e);
                std::process::exit(1);
            });
            println!("{}", json);
        }
        "carta" => match node.as_map() {
            Some(map) => print!("{}", render::document(map)),
            None => {
                eprintln!("Error: document root is not a map");
                std::process::exit(1);
            }
        },
        other => {
            eprintln!("Unknown format '{}'", other);
            std::process::exit(1);
        }
    }
}

/// Handle the tokens command
fn handle_tokens_command(path: &str) {
    let source = read_source(path);
    for token in tokenize(&source) {
        match token {
            Ok(token) => println!("{} {:?} {}", token.position, token.terminal, token.text),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
    }
}
