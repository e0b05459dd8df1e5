use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tyin_emit::OutputFormat;

/// CLI arguments for the tyin binary.
#[derive(Parser, Debug)]
#[command(
    name = "tyin",
    version,
    about = "Infer types for untyped source and report them"
)]
pub struct CliArgs {
    /// Source file to analyze.
    pub file: PathBuf,

    /// Output format for the inferred annotations.
    #[arg(short = 'f', long, value_enum, default_value = "report")]
    pub format: Format,

    /// Override the per-function fixed-point iteration cap.
    #[arg(long = "max-iterations")]
    pub max_iterations: Option<u32>,

    /// Disable colored output.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable report.
    Report,
    /// Declaration-file style output.
    Declaration,
    /// Structured JSON document.
    Json,
    /// Source overlay with inline type comments.
    Inline,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Report => OutputFormat::Report,
            Format::Declaration => OutputFormat::Declaration,
            Format::Json => OutputFormat::Json,
            Format::Inline => OutputFormat::Inline,
        }
    }
}
