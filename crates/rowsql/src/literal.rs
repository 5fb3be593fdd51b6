//! Inline SQL literal rendering.
//!
//! Numbers render bare, everything else is wrapped in single quotes.
//!
//! **No escaping is performed.** A string value containing `'` ends the literal
//! early and whatever follows is parsed as SQL. Only use the inline renderer
//! with values you have validated yourself; prefer
//! [`StatementBuilder::prepare_mutation`](crate::StatementBuilder::prepare_mutation),
//! which binds values as parameters instead.

use serde_json::Value;
use std::fmt;

/// Whether `value` is an integer or floating-point number.
///
/// Strings, booleans, null, arrays and objects are not numeric. Dates arrive
/// as strings and are therefore quoted.
pub fn is_numeric(value: &Value) -> bool {
    matches!(value, Value::Number(_))
}

/// Render `value` as an inline SQL literal. See [`Literal`].
pub fn render_literal(value: &Value) -> String {
    Literal(value).to_string()
}

/// `Display` adapter rendering a value as an inline SQL literal.
///
/// - numbers: plain text (`42`, `3.14`)
/// - strings: raw text in single quotes, embedded quotes left as is
/// - booleans: `'true'` / `'false'`
/// - null: `'null'`
/// - arrays / objects: compact JSON in single quotes
#[derive(Debug, Clone, Copy)]
pub struct Literal<'a>(pub &'a Value);

impl fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "'{s}'"),
            other => write!(f, "'{other}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    #[allow(clippy::approx_constant)]
    fn numeric_classification() {
        assert!(is_numeric(&json!(42)));
        assert!(is_numeric(&json!(3.14)));
        assert!(is_numeric(&json!(2.5)));
        assert!(is_numeric(&json!(-7)));
        assert!(!is_numeric(&json!("foo")));
        assert!(!is_numeric(&json!("42")));
        assert!(!is_numeric(&json!(true)));
        assert!(!is_numeric(&Value::Null));
        assert!(!is_numeric(&json!("2024-03-01")));
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn numbers_render_bare() {
        assert_eq!(render_literal(&json!(42)), "42");
        assert_eq!(render_literal(&json!(2.5)), "2.5");
        assert_eq!(render_literal(&json!(3.14)), "3.14");
        assert_eq!(render_literal(&json!(-1)), "-1");
    }

    #[test]
    fn other_values_render_quoted() {
        assert_eq!(render_literal(&json!("alice")), "'alice'");
        assert_eq!(render_literal(&json!(true)), "'true'");
        assert_eq!(render_literal(&Value::Null), "'null'");
        assert_eq!(render_literal(&json!([1, 2])), "'[1,2]'");
    }

    #[test]
    fn embedded_quotes_are_not_escaped() {
        assert_eq!(render_literal(&json!("O'Brien")), "'O'Brien'");
    }
}
