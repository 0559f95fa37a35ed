//! sqlscan CLI - SQL table/column extraction tool

mod args;
mod config;
mod output;

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use sqlscan_core::{Extractor, ParseResult};

use crate::args::{Args, Command, InputArgs};
use crate::config::Config;

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match run(args) {
        Ok(has_error) => {
            if has_error {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether the query had a syntax error
fn run(args: Args) -> Result<bool> {
    let config = Config::load(args.config.as_ref())?;

    match args.command {
        Command::Parse {
            input,
            pretty,
            no_tree,
        } => {
            let config = config.merge_with_args(&input, pretty, no_tree);
            let sql = read_query(&input)?;
            let result = extract(&config, &sql)?;

            println!("{}", output::render_json(&result, config.pretty)?);
            Ok(result.has_error())
        }

        Command::Tables { input } => {
            // The AST is never shown in the listing
            let config = config.merge_with_args(&input, false, true);
            let sql = read_query(&input)?;
            let result = extract(&config, &sql)?;

            print!("{}", output::render_tables(&result));
            if let Some(error) = &result.error {
                output::print_syntax_error(error, &sql);
            }
            Ok(result.has_error())
        }
    }
}

fn extract(config: &Config, sql: &str) -> Result<ParseResult> {
    let extractor = Extractor::with_options(config.extract_options()?);
    tracing::debug!(options = ?extractor.options(), "extracting");
    Ok(extractor.parse(sql)?)
}

/// Read the query from --query, a file, or stdin
fn read_query(input: &InputArgs) -> Result<String> {
    if let Some(query) = &input.query {
        return Ok(query.clone());
    }

    match &input.file {
        Some(path) => std::fs::read_to_string(path).into_diagnostic(),
        None => {
            let mut sql = String::new();
            std::io::stdin()
                .read_to_string(&mut sql)
                .into_diagnostic()?;
            Ok(sql)
        }
    }
}
