mod commands;
mod config;
mod plugins;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    check, init, migrate, normalize, render, CheckArgs, InitArgs, MigrateArgs, NormalizeArgs,
    RenderArgs,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Folio CLI - render, migrate and check Folio page documents
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a Folio config in the current directory
    Init(InitArgs),

    /// Render a document to HTML or a JSON node tree
    Render(RenderArgs),

    /// Upgrade a stored document to the canonical format
    Migrate(MigrateArgs),

    /// Migrate and recompute cell sizes
    Normalize(NormalizeArgs),

    /// Validate every document under a directory
    Check(CheckArgs),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Render(args) => render(args, &cwd),
        Command::Migrate(args) => migrate(args, &cwd),
        Command::Normalize(args) => normalize(args, &cwd),
        Command::Check(args) => check(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
