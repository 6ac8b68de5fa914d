mod commands;
mod config;
mod script;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    delete, edit, list, new, show, Context, DeleteArgs, EditArgs, NewArgs, ShowArgs,
};
use config::BookforgeConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// BookForge CLI - author interactive books from the terminal
#[derive(Parser, Debug)]
#[command(name = "bookforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ./bookforge.config.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Acting user id
    #[arg(long, global = true, env = "BOOKFORGE_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new project with one empty page
    New(NewArgs),

    /// List your projects, most recently updated first
    List,

    /// Print a project's pages and components
    Show(ShowArgs),

    /// Delete a project
    Delete(DeleteArgs),

    /// Apply a script of editor commands to a project and save it
    Edit(EditArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("Cannot get current directory")?;

    let config = match &cli.config {
        Some(path) => BookforgeConfig::read(path)?,
        None => BookforgeConfig::load(&cwd)?,
    };
    let ctx = Context::new(&config, &cwd, cli.user);

    match cli.command {
        Command::New(args) => new(args, &ctx).await,
        Command::List => list(&ctx).await,
        Command::Show(args) => show(args, &ctx).await,
        Command::Delete(args) => delete(args, &ctx).await,
        Command::Edit(args) => edit(args, &ctx).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
