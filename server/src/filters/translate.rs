//! Query pair translation
//!
//! Turns one raw query pair (`age[>-]`, `18`) into a [`Predicate`]
//! (`age >= 18`). Values are quoted and escaped here; nothing downstream
//! sees raw input.

use std::sync::OnceLock;

use regex::Regex;

use super::array::{self, ArrayOperation};
use super::error::FilterError;
use super::operator::{self, Family, Operator};
use super::predicate::Predicate;
use crate::utils::sql::{NULL_LITERAL, contains_pattern, quote_literal, quote_non_numeric};

/// Cast applied to the key for text-compared operators
pub const TEXT_CAST: &str = "::text";

/// Translate a raw query key and value into a predicate
pub fn translate(key: &str, value: &str) -> Result<Predicate, FilterError> {
    let (key, op) = operator::split_key(key);
    build(key, op, value)
}

/// Shape `value` for an already-resolved key and operator
pub fn build(key: &str, op: Operator, value: &str) -> Result<Predicate, FilterError> {
    let array_op = array::detect(value);

    let mut predicate = Predicate {
        key: key.to_string(),
        operator: match &array_op {
            Some(a) => format!("{} {}", op, a.quantifier),
            None => op.to_string(),
        },
        ..Default::default()
    };

    match op.family() {
        Family::Text => {
            predicate.type_cast = TEXT_CAST.to_string();
            match array_op {
                Some(array_op) => {
                    if op.is_similar() {
                        return Err(FilterError::wrong_format(op.as_sql()));
                    }
                    predicate.value = text_array(&array_op, op.is_like())?;
                }
                None => {
                    if value == NULL_LITERAL {
                        predicate.operator = match op {
                            Operator::Eq => "is".to_string(),
                            Operator::Ne => "is not".to_string(),
                            _ => return Err(FilterError::null_not_allowed(op.as_sql())),
                        };
                    }
                    predicate.value = if op.is_like() {
                        quote_literal(&contains_pattern(value))
                    } else {
                        quote_literal(value)
                    };
                }
            }
        }
        Family::Range => {
            if array_op.is_some() {
                return Err(FilterError::wrong_format(op.as_sql()));
            }
            predicate.value = range(op, value)?;
        }
        Family::Ordered => {
            predicate.value = match array_op {
                Some(array_op) => ordered_array(&array_op)?,
                None => quote_non_numeric(value),
            };
        }
    }

    Ok(predicate)
}

/// Array elements for text comparison are always quoted
fn text_array(array_op: &ArrayOperation, like: bool) -> Result<String, FilterError> {
    let items: Vec<String> = array::elements(&array_op.literal)?
        .iter()
        .map(|item| {
            if like {
                quote_literal(&contains_pattern(item))
            } else {
                quote_literal(item)
            }
        })
        .collect();
    finish_array(array_op, &items)
}

/// Array elements for ordered comparison keep digit-only values bare
fn ordered_array(array_op: &ArrayOperation) -> Result<String, FilterError> {
    let items: Vec<String> = array::elements(&array_op.literal)?
        .iter()
        .map(|item| quote_non_numeric(item))
        .collect();
    finish_array(array_op, &items)
}

fn finish_array(array_op: &ArrayOperation, items: &[String]) -> Result<String, FilterError> {
    if items.is_empty() {
        return Err(FilterError::wrong_format(array_op.operation_name()));
    }
    Ok(array::array_constructor(items))
}

/// Range values are `[<low>{;}<high>]`
fn range_value() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[(.+)\{;\}(.+)\]$").expect("Invalid regex"))
}

fn range(op: Operator, value: &str) -> Result<String, FilterError> {
    let caps = range_value()
        .captures(value)
        .ok_or_else(|| FilterError::wrong_format(op.as_sql()))?;
    let (Some(low), Some(high)) = (caps.get(1), caps.get(2)) else {
        return Err(FilterError::wrong_format(op.as_sql()));
    };
    let (low, high) = (low.as_str(), high.as_str());
    if low == NULL_LITERAL || high == NULL_LITERAL {
        return Err(FilterError::null_not_allowed(op.as_sql()));
    }
    Ok(format!(
        "{} and {}",
        quote_non_numeric(low),
        quote_non_numeric(high)
    ))
}
