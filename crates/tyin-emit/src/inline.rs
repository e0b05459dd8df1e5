//! Inline-comment source overlay.
//!
//! Inserts `/* : T */` after each binding position, producing a copy of
//! the source a reader can skim with the inferred types in place.

use tyin_infer::{AnnotationKind, InferenceResult};

pub fn render(result: &InferenceResult, source: &str) -> String {
    // Insert from the back so earlier offsets stay valid
    let mut insertions: Vec<(usize, String)> = result
        .annotations
        .iter()
        .filter(|annotation| {
            matches!(
                annotation.kind,
                AnnotationKind::Variable
                    | AnnotationKind::Const
                    | AnnotationKind::Parameter
                    | AnnotationKind::Element
                    | AnnotationKind::Field
            )
        })
        .map(|annotation| {
            (
                annotation.end as usize,
                format!(" /* : {} */", annotation.type_string),
            )
        })
        .collect();
    insertions.sort_by(|a, b| b.0.cmp(&a.0));
    insertions.dedup_by(|a, b| a.0 == b.0);

    let mut out = source.to_string();
    for (offset, text) in insertions {
        if offset <= out.len() && out.is_char_boundary(offset) {
            out.insert_str(offset, &text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyin_infer::{InferOptions, infer};
    use tyin_parser::parse;

    #[test]
    fn test_overlay_inserts_after_bindings() {
        let source = "const x = 1;";
        let parsed = parse(source);
        let result = infer(&parsed.program, source, "t.js", &InferOptions::default());
        let overlay = render(&result, source);
        assert!(overlay.contains("const x /* : 1 */ = 1;"), "{overlay}");
    }
}
