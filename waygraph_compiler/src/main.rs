//! CLI entry point for waygraph.
//! Usage: cargo run -p waygraph_compiler -- compile regions.json --out-dir worlds/lwn

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::info;

use waygraph_compiler::{CompilerConfig, compile};
use waygraph_data::{RawDocument, validate_document};

#[derive(Parser)]
#[command(name = "waygraph", about = "Compile a region graph into host world modules")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile the graph and write locations.py, regions.py and rules.py.
    Compile {
        input: PathBuf,
        /// Compiler settings (TOML); defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Validate the graph and report every problem without writing anything.
    Check {
        input: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Compile { input, config, out_dir } => run_compile(&input, config.as_deref(), &out_dir),
        Command::Check { input, config } => run_check(&input, config.as_deref()),
    };
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<CompilerConfig> {
    match path {
        Some(path) => Ok(CompilerConfig::load(path)?),
        None => Ok(CompilerConfig::default()),
    }
}

fn load_document(path: &Path) -> Result<RawDocument> {
    let text = fs::read_to_string(path).with_context(|| format!("reading graph from '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing graph JSON from '{}'", path.display()))
}

fn run_compile(input: &Path, config: Option<&Path>, out_dir: &Path) -> Result<()> {
    let config = load_config(config)?;
    let doc = load_document(input)?;
    let artifacts = compile(&doc, &config).with_context(|| format!("compiling '{}'", input.display()))?;

    fs::create_dir_all(out_dir).with_context(|| format!("creating '{}'", out_dir.display()))?;
    let written = artifacts
        .write_to(out_dir)
        .with_context(|| format!("writing modules to '{}'", out_dir.display()))?;
    for path in written {
        info!("wrote {}", path.display());
    }
    println!("Files generated successfully.");
    Ok(())
}

fn run_check(input: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let doc = load_document(input)?;
    let problems = validate_document(&doc);
    for problem in &problems {
        eprintln!("{}: {problem}", input.display());
    }
    if !problems.is_empty() {
        bail!("{} validation problem(s)", problems.len());
    }
    // Structure is sound; compiling also checks every rule.
    compile(&doc, &config).with_context(|| format!("compiling '{}'", input.display()))?;
    eprintln!("check: OK ({} regions)", doc.regions.len());
    Ok(())
}
