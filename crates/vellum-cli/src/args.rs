//! Command-line argument definitions for the Vellum CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input document, the output path and
//! format, page selection, configuration file selection, and logging
//! verbosity.

use clap::{Parser, ValueEnum};

/// What the CLI writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Render lists of every page (or the selected page) as JSON
    #[default]
    Json,
    /// SVG preview of one page
    Svg,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Svg => "svg",
        }
    }
}

/// Command-line arguments for the Vellum translator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input document (JSON input tree)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file; `out.json` or `out.svg` by default
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Page to export: id, name or 1-based index. SVG output uses the first
    /// page when unset.
    #[arg(short, long)]
    pub page: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// The output path, defaulting by format.
    pub fn output_path(&self) -> String {
        self.output
            .clone()
            .unwrap_or_else(|| format!("out.{}", self.format.extension()))
    }
}
