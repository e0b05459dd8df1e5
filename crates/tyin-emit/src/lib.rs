//! Output formatters for inference results.
//!
//! Four surfaces over the same annotation list:
//! - `report` - human-readable, colored
//! - `declaration` - declaration-file style
//! - `json` - structured JSON document
//! - `inline` - source overlay with type comments

pub mod declaration;
pub mod inline;
pub mod json;
pub mod report;

use tyin_infer::InferenceResult;

/// The output surface selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Report,
    Declaration,
    Json,
    Inline,
}

/// Render an inference result in the requested format.
pub fn format_result(
    result: &InferenceResult,
    format: OutputFormat,
    source: &str,
    filename: &str,
) -> String {
    match format {
        OutputFormat::Report => report::render(result, filename),
        OutputFormat::Declaration => declaration::render(result),
        OutputFormat::Json => json::render(result, filename),
        OutputFormat::Inline => inline::render(result, source),
    }
}
