//! CLI argument definitions

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sqlscan")]
#[command(author, version, about = "Extract tables, columns and literal values from SQL")]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file (defaults to the nearest sqlscan.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse SQL and print the extraction result as JSON
    Parse {
        #[command(flatten)]
        input: InputArgs,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Omit the parser AST from the output
        #[arg(long = "no-tree")]
        no_tree: bool,
    },

    /// Print the tables and columns of each statement
    Tables {
        #[command(flatten)]
        input: InputArgs,
    },
}

/// Where the query comes from and how to read it
#[derive(ClapArgs)]
pub struct InputArgs {
    /// Query to parse (e.g. 'select * from test')
    #[arg(short, long, env = "SQLSCAN_QUERY", conflicts_with = "file")]
    pub query: Option<String>,

    /// SQL file to parse; reads stdin when neither a file nor --query is given
    pub file: Option<PathBuf>,

    /// SQL dialect
    #[arg(short, long)]
    pub dialect: Option<String>,

    /// Treat bind placeholders (?, $1) as comparison values
    #[arg(long = "allow-placeholders")]
    pub allow_placeholders: bool,
}
