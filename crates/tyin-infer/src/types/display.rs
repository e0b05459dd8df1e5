//! Deterministic type-to-string rendering.
//!
//! Structurally equal types produce identical strings; union member
//! order is the stored insertion order, so output is stable across
//! runs.

use super::def::*;
use super::intern::TypeInterner;

/// Render a type id to its display string.
pub fn type_to_string(interner: &TypeInterner, ty: TypeId) -> String {
    render(interner, ty, &mut Vec::new())
}

fn render(interner: &TypeInterner, ty: TypeId, in_progress: &mut Vec<TypeId>) -> String {
    if in_progress.contains(&ty) {
        return "self".to_string();
    }
    let Some(data) = interner.lookup(ty) else {
        return "unknown".to_string();
    };
    match data {
        TypeData::Any { .. } => "any".to_string(),
        TypeData::Unknown => "unknown".to_string(),
        TypeData::Never => "never".to_string(),
        TypeData::Undefined => "undefined".to_string(),
        TypeData::Null => "null".to_string(),
        TypeData::Boolean => "boolean".to_string(),
        TypeData::Number => "number".to_string(),
        TypeData::String => "string".to_string(),
        TypeData::BigInt => "bigint".to_string(),
        TypeData::Symbol => "symbol".to_string(),
        TypeData::Literal(lit) => render_literal(interner, &lit),
        TypeData::Array(element) => {
            in_progress.push(ty);
            let inner = render(interner, element, in_progress);
            in_progress.pop();
            if needs_parens(interner, element) {
                format!("({inner})[]")
            } else {
                format!("{inner}[]")
            }
        }
        TypeData::Tuple(elements) => {
            in_progress.push(ty);
            let parts: Vec<String> = elements
                .iter()
                .map(|e| render(interner, *e, in_progress))
                .collect();
            in_progress.pop();
            format!("[{}]", parts.join(", "))
        }
        TypeData::Object(shape) => {
            if shape.props.is_empty() {
                return if shape.open { "{ ... }".to_string() } else { "{}".to_string() };
            }
            in_progress.push(ty);
            let mut parts: Vec<String> = shape
                .props
                .iter()
                .map(|p| {
                    format!(
                        "{}: {}",
                        interner.resolve_atom(p.name),
                        render(interner, p.ty, in_progress)
                    )
                })
                .collect();
            in_progress.pop();
            if shape.open {
                parts.push("...".to_string());
            }
            format!("{{ {} }}", parts.join("; "))
        }
        TypeData::Function(shape) => {
            in_progress.push(ty);
            let params: Vec<String> = shape
                .params
                .iter()
                .map(|p| {
                    let name = interner.resolve_atom(p.name);
                    let rendered = render(interner, p.ty, in_progress);
                    if p.rest {
                        format!("...{name}: {rendered}")
                    } else if p.optional {
                        format!("{name}?: {rendered}")
                    } else {
                        format!("{name}: {rendered}")
                    }
                })
                .collect();
            let return_type = render(interner, shape.return_type, in_progress);
            in_progress.pop();
            let arrow = format!("({}) => {return_type}", params.join(", "));
            if shape.is_async {
                format!("async {arrow}")
            } else {
                arrow
            }
        }
        TypeData::Class(shape) => {
            format!("class {}", interner.resolve_atom(shape.name))
        }
        TypeData::Union(members) => {
            in_progress.push(ty);
            let parts: Vec<String> = members
                .iter()
                .map(|m| {
                    let inner = render(interner, *m, in_progress);
                    if needs_parens(interner, *m) {
                        format!("({inner})")
                    } else {
                        inner
                    }
                })
                .collect();
            in_progress.pop();
            parts.join(" | ")
        }
        TypeData::Intersection(members) => {
            in_progress.push(ty);
            let parts: Vec<String> = members
                .iter()
                .map(|m| {
                    let inner = render(interner, *m, in_progress);
                    if needs_parens(interner, *m) {
                        format!("({inner})")
                    } else {
                        inner
                    }
                })
                .collect();
            in_progress.pop();
            parts.join(" & ")
        }
        TypeData::Promise(resolved) => {
            in_progress.push(ty);
            let inner = render(interner, resolved, in_progress);
            in_progress.pop();
            format!("Promise<{inner}>")
        }
        TypeData::Var(var) => {
            let hint = interner
                .var_data(var)
                .map(|data| interner.resolve_atom(data.hint))
                .unwrap_or_default();
            if hint.is_empty() {
                format!("'t{}", var.0)
            } else {
                format!("'{hint}")
            }
        }
        TypeData::Recursive { body, .. } => {
            in_progress.push(ty);
            let inner = render(interner, body, in_progress);
            in_progress.pop();
            inner
        }
        TypeData::RecRef(_) => "self".to_string(),
    }
}

fn render_literal(interner: &TypeInterner, lit: &LiteralValue) -> String {
    match lit {
        LiteralValue::String(atom) => format!("\"{}\"", interner.resolve_atom(*atom)),
        LiteralValue::Number(value) => render_number(value.0),
        LiteralValue::BigInt(atom) => format!("{}n", interner.resolve_atom(*atom)),
        LiteralValue::Boolean(value) => value.to_string(),
    }
}

fn render_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        return format!("{}", value as i64);
    }
    format!("{value}")
}

/// Whether a type needs parentheses when nested inside a union,
/// intersection, or array element position.
fn needs_parens(interner: &TypeInterner, ty: TypeId) -> bool {
    matches!(
        interner.lookup(ty),
        Some(TypeData::Union(_) | TypeData::Intersection(_) | TypeData::Function(_))
    )
}
