//! Command-line interface for the converter.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use console::style;

use crate::config::ConverterConfig;
use crate::error::{ConverterError, Result};
use crate::output::{render, save_document, OutputFormat};
use crate::parser::{choose_parser, ParserKind};

/// Convert a tokenized PKI Certificate Policy into an OSCAL catalog.
#[derive(Parser)]
#[command(name = "pki-policy-converter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Tokenized policy file, one sentence or structural line per line
    pub policy: PathBuf,

    /// Parser configuration file (.toml, .yaml or .yml)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Parser to use
    #[arg(short, long, value_enum, default_value_t = ParserKind::Simple)]
    pub parser: ParserKind,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Output directory (default: print to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    convert_command(&cli)
}

/// Execute a conversion.
fn convert_command(cli: &Cli) -> Result<()> {
    if let Some(output_dir) = cli.output.as_deref() {
        check_output_dir(output_dir)?;
    }

    let config = ConverterConfig::load(&cli.config)?;
    let content = fs::read_to_string(&cli.policy)?;
    let lines: Vec<String> = content.lines().map(String::from).collect();

    eprintln!(
        "{} {} with the {} parser",
        style("Converting").bold(),
        style(cli.policy.display()).cyan(),
        style(cli.parser).green()
    );

    let parser = choose_parser(cli.parser, config);
    let document = parser.policy_to_catalog(&lines)?;
    let Some(catalog) = document.catalog.as_ref() else {
        return Err(ConverterError::EmptyDocument);
    };

    eprintln!("  Title: {}", style(&catalog.metadata.title).green());
    eprintln!("  Version: {}", catalog.metadata.version);
    eprintln!("  Groups: {}", catalog.groups.len());
    eprintln!("  Resources: {}", catalog.back_matter.resources.len());

    match cli.output.as_deref() {
        Some(output_dir) => {
            let path = save_document(&document, parser.kind(), cli.format, output_dir)?;
            eprintln!();
            eprintln!("{} {}", style("Saved to:").green().bold(), path.display());
        }
        None => print!("{}", render(&document, cli.format)?),
    }

    Ok(())
}

fn check_output_dir(output_dir: &Path) -> Result<()> {
    if !output_dir.exists() {
        return Err(ConverterError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Output directory does not exist: {}", output_dir.display()),
        )));
    }
    if !output_dir.is_dir() {
        return Err(ConverterError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Output path is not a directory: {}", output_dir.display()),
        )));
    }
    Ok(())
}
