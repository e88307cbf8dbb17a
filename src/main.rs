mod cli;

use std::process::ExitCode;

use clap::Parser;
use cyk::{algorithm_state_to_string, chart_to_string, generator, is_derived, parser, Grammar};
use rand::prelude::*;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use cli::Cli;

fn log_level(name: &str) -> Level {
    match name {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

fn check_word(grammar: &Grammar, word: &str, cli: &Cli) {
    if cli.sentential {
        match algorithm_state_to_string(grammar, word) {
            Ok(chart) => print!("{}", chart),
            Err(e) => eprintln!("{}: {}", word, e),
        }
        return;
    }

    match is_derived(grammar, word) {
        Ok(true) => println!("{}: accepted", word),
        Ok(false) => println!("{}: rejected", word),
        Err(e) => {
            eprintln!("{}: {}", word, e);
            return;
        }
    }
    if cli.trace {
        if let Ok(chart) = chart_to_string(grammar, word) {
            print!("{}", chart);
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(&cli.log_level))
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Could not set up logging: {}", e);
    }

    let mut grammar = match parser::parse_file(&cli.file) {
        Ok(grammar) => grammar,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            return ExitCode::FAILURE;
        }
    };
    info!(file = %cli.file.display(), "loaded grammar");

    if let Some(start) = cli.start {
        if let Err(e) = grammar.set_start_symbol(start) {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    }

    if cli.grammar {
        print!("{}", grammar);
    }

    for word in &cli.words {
        check_word(&grammar, word, &cli);
    }

    if let Some(amount) = cli.generate {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        for _ in 0..amount {
            match generator::generate(&grammar, &mut rng, cli.max_depth) {
                Ok(word) => println!("{}", word),
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    return ExitCode::SUCCESS;
}
