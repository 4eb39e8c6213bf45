//! sqlstrip CLI

use clap::{Parser, Subcommand};
use sqlstrip::{LoaderConfig, Result, SqlScriptLoader};
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

#[derive(Parser)]
#[command(name = "sqlstrip")]
#[command(about = "Strip block comments from SQL scripts and split them into batches")]
#[command(version)]
struct Cli {
    /// JSON loader config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print or save a script with block comments removed
    Strip {
        /// Script to read
        input: PathBuf,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the batches of a script
    Batches {
        /// Script to read
        input: PathBuf,
        /// Override the configured separator
        #[arg(short, long)]
        separator: Option<String>,
    },
}

#[derive(Tabled)]
struct BatchRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Line")]
    line: usize,
    #[tabled(rename = "Lines")]
    lines: usize,
    #[tabled(rename = "First")]
    first: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sqlstrip=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Strip { input, output } => {
            cmd_strip(&SqlScriptLoader::new(config), &input, output.as_deref())?
        }
        Commands::Batches { input, separator } => {
            let config = match separator {
                Some(sep) => config.with_separator(sep)?,
                None => config,
            };
            cmd_batches(&SqlScriptLoader::new(config), &input)?
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<LoaderConfig> {
    match path {
        Some(p) => LoaderConfig::from_file(p),
        None => Ok(LoaderConfig::default()),
    }
}

fn cmd_strip(loader: &SqlScriptLoader, input: &Path, output: Option<&Path>) -> Result<()> {
    let script = loader.load(input)?;
    match output {
        Some(out) => {
            loader.save(out, &script.text)?;
            println!("Wrote {}", out.display());
        }
        None => print!("{}", script.text),
    }
    Ok(())
}

fn cmd_batches(loader: &SqlScriptLoader, input: &Path) -> Result<()> {
    let batches = loader.load_batches(input)?;
    if batches.is_empty() {
        println!("No batches found.");
        return Ok(());
    }

    let rows: Vec<BatchRow> = batches
        .iter()
        .map(|b| BatchRow {
            index: b.index,
            line: b.start_line,
            lines: b.line_count(),
            first: truncate(b.first_line(), 60),
        })
        .collect();

    println!("{}", Table::new(rows));
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}
