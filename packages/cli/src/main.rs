mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    normalize, render, select, tools, NormalizeArgs, RenderArgs, SelectArgs, ToolsArgs,
};
use tracing_subscriber::EnvFilter;

/// Guide editor - render and edit guide content blocks
#[derive(Parser, Debug)]
#[command(name = "guide-editor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mount a document, load its blocks' data and print the result
    Render(RenderArgs),

    /// Re-serialize a document without loading any data
    Normalize(NormalizeArgs),

    /// Select an entity in a picker block and print the new document
    Select(SelectArgs),

    /// List the registered block tools
    Tools(ToolsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(e) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Render(args) => render(args, &cwd).await,
        Command::Normalize(args) => normalize(args),
        Command::Select(args) => select(args, &cwd).await,
        Command::Tools(args) => tools(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
