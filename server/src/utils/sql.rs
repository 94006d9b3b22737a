//! SQL literal helpers
//!
//! Quoting and LIKE escaping used when rendering filter values into
//! SQL literal form.

/// SQL `NULL` literal as it arrives in query values
pub const NULL_LITERAL: &str = "null";

/// Escape SQL LIKE wildcards (`%`, `_`) in user input
///
/// Backslashes are left as-is; the database's default LIKE escape
/// character is `\`, so the prefixed wildcards match literally.
///
/// # Example
///
/// ```
/// use qfilter_server::utils::sql::escape_like_pattern;
///
/// let pattern = format!("%{}%", escape_like_pattern("100% match_test"));
/// assert_eq!(pattern, "%100\\% match\\_test%");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('%', "\\%").replace('_', "\\_")
}

/// Build a "contains" LIKE pattern: escaped input wrapped in `%`
pub fn contains_pattern(s: &str) -> String {
    format!("%{}%", escape_like_pattern(s))
}

/// Single-quote a value, doubling embedded quotes.
///
/// The literal `null` is returned unquoted so it can be compared with
/// `IS` / `IS NOT`.
pub fn quote_literal(value: &str) -> String {
    if value == NULL_LITERAL {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', "''"))
}

/// Quote a value unless it consists only of ASCII digits.
///
/// The empty string counts as digits-only and is returned as-is.
pub fn quote_non_numeric(value: &str) -> String {
    if is_digits(value) {
        value.to_string()
    } else {
        quote_literal(value)
    }
}

fn is_digits(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}
