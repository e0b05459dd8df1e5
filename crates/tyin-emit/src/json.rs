//! Structured JSON output.

use tyin_infer::InferenceResult;

pub fn render(result: &InferenceResult, filename: &str) -> String {
    let document = serde_json::json!({
        "filename": filename,
        "annotations": result.annotations,
        "errors": result.errors,
        "warnings": result.warnings,
        "cfg_stats": result.cfg_stats,
    });
    serde_json::to_string_pretty(&document).unwrap_or_else(|_| "{}".to_string())
}
