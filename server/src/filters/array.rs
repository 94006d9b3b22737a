//! Array operations
//!
//! A value of the form `any([...])` or `all([...])` compares the key
//! against every element of a JSON array literal.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Number, Value};

use super::error::FilterError;

/// Array quantifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    Any,
    All,
}

impl Quantifier {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::All => "all",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "any" => Some(Self::Any),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A detected array operation: quantifier plus the raw JSON array literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayOperation {
    pub quantifier: Quantifier,
    pub literal: String,
}

impl ArrayOperation {
    /// Operation name used in error messages, e.g. `any(array[])`
    pub fn operation_name(&self) -> String {
        format!("{}(array[])", self.quantifier)
    }
}

fn array_operation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+)\(\[(.+)\]\)$").expect("Invalid regex"))
}

/// Detect `<quantifier>([<inner>])`.
///
/// A syntactic match with a quantifier other than `any` / `all` is not an
/// array operation.
pub fn detect(value: &str) -> Option<ArrayOperation> {
    let caps = array_operation().captures(value)?;
    let quantifier = Quantifier::parse(caps.get(1)?.as_str())?;
    let inner = caps.get(2)?.as_str();
    Some(ArrayOperation {
        quantifier,
        literal: format!("[{}]", inner),
    })
}

/// Decode a JSON array literal into the textual form of each element.
///
/// Strings yield their contents. Whole-number floats such as `1.0` or `1e3`
/// print as integers; other numbers, booleans and `null` yield their JSON
/// spelling. Nested arrays and objects yield their compact JSON.
pub fn elements(literal: &str) -> Result<Vec<String>, FilterError> {
    let values: Vec<Value> =
        serde_json::from_str(literal).map_err(|source| FilterError::ArrayLiteral { source })?;
    Ok(values.into_iter().map(element_text).collect())
}

fn element_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => number_text(&n),
        other => other.to_string(),
    }
}

fn number_text(n: &Number) -> String {
    if n.is_f64()
        && let Some(f) = n.as_f64()
        && f.is_finite()
        && f.fract() == 0.0
    {
        if f >= i64::MIN as f64 && f < i64::MAX as f64 {
            return (f as i64).to_string();
        }
        if f >= 0.0 && f < u64::MAX as f64 {
            return (f as u64).to_string();
        }
    }
    n.to_string()
}

/// Render already-quoted elements as a SQL array constructor
pub fn array_constructor(items: &[String]) -> String {
    format!("(array[{}])", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_any_and_all() {
        let op = detect(r#"any(["a","b"])"#).unwrap();
        assert_eq!(op.quantifier, Quantifier::Any);
        assert_eq!(op.literal, r#"["a","b"]"#);

        let op = detect("all([1, 2])").unwrap();
        assert_eq!(op.quantifier, Quantifier::All);
        assert_eq!(op.literal, "[1, 2]");
    }

    #[test]
    fn detect_rejects_other_quantifiers() {
        assert!(detect("some([1])").is_none());
        assert!(detect("ANY([1])").is_none());
        assert!(detect(" any([1])").is_none());
    }

    #[test]
    fn detect_requires_shape() {
        assert!(detect("any").is_none());
        assert!(detect("any([])").is_none());
        assert!(detect("any([1]) ").is_none());
        assert!(detect("[1, 2]").is_none());
        assert!(detect("plain text").is_none());
    }

    #[test]
    fn operation_name() {
        let op = detect("all([1])").unwrap();
        assert_eq!(op.operation_name(), "all(array[])");
    }

    #[test]
    fn elements_render_loosely_typed_values() {
        let items = elements(r#"["x", 1, 2.5, true, null, [1,2], {"a":1}]"#).unwrap();
        assert_eq!(
            items,
            vec!["x", "1", "2.5", "true", "null", "[1,2]", r#"{"a":1}"#]
        );
    }

    #[test]
    fn elements_whole_floats_print_as_integers() {
        let items = elements("[1.0, 1e3, -4.0, 0.5, 12345678901234567890]").unwrap();
        assert_eq!(
            items,
            vec!["1", "1000", "-4", "0.5", "12345678901234567890"]
        );
    }

    #[test]
    fn elements_rejects_non_array() {
        let err = elements("[1,").unwrap_err();
        assert!(matches!(err, FilterError::ArrayLiteral { .. }));

        let err = elements(r#"["a" "b"]"#).unwrap_err();
        assert!(matches!(err, FilterError::ArrayLiteral { .. }));
    }

    #[test]
    fn elements_empty_array() {
        assert!(elements("[ ]").unwrap().is_empty());
    }

    #[test]
    fn constructor_joins_with_comma_space() {
        let items = vec!["'a'".to_string(), "2".to_string()];
        assert_eq!(array_constructor(&items), "(array['a', 2])");
    }
}
