//! Human-readable report output.

use colored::Colorize;
use tyin_infer::{AnnotationKind, InferenceResult};

pub fn render(result: &InferenceResult, filename: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", filename.bold()));

    for annotation in &result.annotations {
        let kind = kind_label(annotation.kind);
        let name = annotation.name.as_deref().unwrap_or("<expr>");
        out.push_str(&format!(
            "  {}:{} {} {}: {}\n",
            annotation.line + 1,
            annotation.column + 1,
            kind.dimmed(),
            name,
            annotation.type_string.cyan()
        ));
    }

    if !result.errors.is_empty() {
        out.push('\n');
        for error in &result.errors {
            out.push_str(&format!(
                "  {} {}:{} {}\n",
                "error".red().bold(),
                error.line + 1,
                error.column + 1,
                error.message
            ));
        }
    }
    if !result.warnings.is_empty() {
        out.push('\n');
        for warning in &result.warnings {
            out.push_str(&format!(
                "  {} {}:{} {}\n",
                "warning".yellow().bold(),
                warning.line + 1,
                warning.column + 1,
                warning.message
            ));
        }
    }

    out.push_str(&format!(
        "\n  {} {} blocks, {} edges, {} back-edges, {} iterations\n",
        "cfg".dimmed(),
        result.cfg_stats.blocks,
        result.cfg_stats.edges,
        result.cfg_stats.back_edges,
        result.cfg_stats.iterations
    ));
    out
}

fn kind_label(kind: AnnotationKind) -> &'static str {
    match kind {
        AnnotationKind::Variable => "let",
        AnnotationKind::Const => "const",
        AnnotationKind::Parameter => "param",
        AnnotationKind::Function => "function",
        AnnotationKind::Return => "return",
        AnnotationKind::Property => "property",
        AnnotationKind::Element => "element",
        AnnotationKind::Expression => "expr",
        AnnotationKind::Class => "class",
        AnnotationKind::Method => "method",
        AnnotationKind::Field => "field",
    }
}
