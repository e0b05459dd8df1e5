//! Declaration-file style output.
//!
//! One `declare` line per named top-level-ish binding. Function
//! annotations carry arrow-style signatures which are rewritten to
//! declaration form.

use tyin_infer::{AnnotationKind, InferenceResult};

pub fn render(result: &InferenceResult) -> String {
    let mut out = String::new();
    for annotation in &result.annotations {
        let Some(name) = annotation.name.as_deref() else {
            continue;
        };
        match annotation.kind {
            AnnotationKind::Variable => {
                out.push_str(&format!("declare let {name}: {};\n", annotation.type_string));
            }
            AnnotationKind::Const => {
                out.push_str(&format!(
                    "declare const {name}: {};\n",
                    annotation.type_string
                ));
            }
            AnnotationKind::Function => {
                match split_signature(&annotation.type_string) {
                    Some((params, return_type)) => out.push_str(&format!(
                        "declare function {name}({params}): {return_type};\n"
                    )),
                    None => out.push_str(&format!(
                        "declare function {name}: {};\n",
                        annotation.type_string
                    )),
                }
            }
            AnnotationKind::Class => {
                out.push_str(&format!("declare class {name} {{}}\n"));
            }
            _ => {}
        }
    }
    out
}

/// Split `(a: T, b: U) => R` (optionally `async `-prefixed) into the
/// parameter list and the return type.
fn split_signature(signature: &str) -> Option<(&str, &str)> {
    let signature = signature.strip_prefix("async ").unwrap_or(signature);
    let rest = signature.strip_prefix('(')?;
    let mut depth = 1usize;
    for (index, ch) in rest.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    let params = &rest[..index];
                    let tail = rest[index + 1..].strip_prefix(" => ")?;
                    return Some((params, tail));
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_signature() {
        assert_eq!(
            split_signature("(x: number | string) => number"),
            Some(("x: number | string", "number"))
        );
        assert_eq!(split_signature("() => undefined"), Some(("", "undefined")));
        assert_eq!(
            split_signature("async (x: number) => Promise<number>"),
            Some(("x: number", "Promise<number>"))
        );
        assert_eq!(
            split_signature("(f: (n: number) => string) => string"),
            Some(("f: (n: number) => string", "string"))
        );
        assert_eq!(split_signature("number"), None);
    }
}
