// mel: parse a mel program and print its syntax tree

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use mel::{parse, AstNode, NodeCensus};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Program parsed when no input path is given.
const SAMPLE_PROGRAM: &str = r#"
    input a input b  /* comment 1
    input c
    */
    c = a + b * (2 - 1) + 0  // comment 2
    output c + 1

    if (a + 7) > b then b = 9 else b = 0 end if
"#;

#[derive(Debug, ClapParser)]
#[command(name = "mel", version, about = "Print the syntax tree of a mel program")]
struct Cli {
    /// Source file to parse; `-` reads stdin. Defaults to a built-in sample.
    path: Option<PathBuf>,

    /// Print node counts per kind after the tree
    #[arg(long)]
    stats: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let source = read_source(cli.path.as_ref())?;

    let program = parse(&source)?;
    let census = NodeCensus::of(&program);
    info!(
        statements = program.len(),
        nodes = census.total(),
        "parsed successfully"
    );

    for line in program.tree() {
        println!("{}", line);
    }

    if cli.stats {
        println!();
        for (kind, count) in census.entries() {
            println!("{:<10} {}", kind.name(), count);
        }
        println!("{:<10} {}", "total", census.total());
    }

    Ok(())
}

fn read_source(path: Option<&PathBuf>) -> Result<String> {
    match path {
        None => {
            info!("no input file given, using built-in sample");
            Ok(SAMPLE_PROGRAM.to_string())
        }
        Some(path) if path.as_os_str() == "-" => {
            info!("reading source from stdin");
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read stdin")?;
            Ok(source)
        }
        Some(path) => {
            info!(path = %path.display(), "reading source file");
            fs::read_to_string(path)
                .with_context(|| format!("failed to read '{}'", path.display()))
        }
    }
}
