//! Operator tokens
//!
//! Query keys may end in a bracketed operator token, e.g. `price[>-]`.
//! The token vocabulary is closed; each token maps to one SQL operator.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// SQL comparison operators reachable from query keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    Like,
    NotLike,
    SimilarTo,
    NotSimilarTo,
    Between,
    NotBetween,
    /// `~` (POSIX regex, case sensitive)
    Match,
    /// `~*` (POSIX regex, case insensitive)
    IMatch,
    NotMatch,
    NotIMatch,
}

/// Value-shaping family an operator belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Compared as text (`::text` cast), `null` maps to `IS` / `IS NOT`
    Text,
    /// Two-valued `BETWEEN` forms
    Range,
    /// Ordered comparisons, values keep their numeric form
    Ordered,
}

impl Operator {
    /// Map a bracket token to its operator
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            ">" => Self::Gt,
            "<" => Self::Lt,
            ">-" => Self::Gte,
            "<-" => Self::Lte,
            "!" | "<>" => Self::Ne,
            "%" | "like" => Self::Like,
            "!%" | "not_like" => Self::NotLike,
            "+" | "similar_to" => Self::SimilarTo,
            "!+" | "not_similar_to" => Self::NotSimilarTo,
            ":" | "between" => Self::Between,
            "!:" | "not_between" => Self::NotBetween,
            "~" => Self::Match,
            "~*" => Self::IMatch,
            "!~" => Self::NotMatch,
            "!~*" => Self::NotIMatch,
            _ => return None,
        };
        Some(op)
    }

    /// Canonical SQL spelling
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Like => "like",
            Self::NotLike => "not like",
            Self::SimilarTo => "similar to",
            Self::NotSimilarTo => "not similar to",
            Self::Between => "between",
            Self::NotBetween => "not between",
            Self::Match => "~",
            Self::IMatch => "~*",
            Self::NotMatch => "!~",
            Self::NotIMatch => "!~*",
        }
    }

    pub fn family(&self) -> Family {
        match self {
            Self::Eq
            | Self::Ne
            | Self::Like
            | Self::NotLike
            | Self::SimilarTo
            | Self::NotSimilarTo
            | Self::Match
            | Self::IMatch
            | Self::NotMatch
            | Self::NotIMatch => Family::Text,
            Self::Between | Self::NotBetween => Family::Range,
            Self::Gt | Self::Lt | Self::Gte | Self::Lte => Family::Ordered,
        }
    }

    pub fn is_like(&self) -> bool {
        matches!(self, Self::Like | Self::NotLike)
    }

    pub fn is_similar(&self) -> bool {
        matches!(self, Self::SimilarTo | Self::NotSimilarTo)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

fn operator_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\[(>|<|>-|<-|!|<>|~\*|~|!~\*|!~|\+|!\+|!%|%|!:|:|like|not_like|between|not_between|similar_to|not_similar_to)\]$",
        )
        .expect("Invalid regex")
    })
}

/// Split a raw query key into the bare key and its operator.
///
/// The key is trimmed first. Without a recognised suffix the operator is
/// `=` and the key is returned unchanged, brackets included.
pub fn split_key(raw: &str) -> (&str, Operator) {
    let key = raw.trim();
    let Some(caps) = operator_suffix().captures(key) else {
        return (key, Operator::Eq);
    };
    let (Some(whole), Some(token)) = (caps.get(0), caps.get(1)) else {
        return (key, Operator::Eq);
    };
    match Operator::from_token(token.as_str()) {
        Some(op) => (&key[..whole.start()], op),
        None => (key, Operator::Eq),
    }
}

/// True when the key still ends in a `[...]` suffix
pub fn has_bracket_suffix(key: &str) -> bool {
    key.ends_with(']') && key.contains('[')
}
