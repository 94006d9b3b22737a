//! Predicate data model
//!
//! A [`Predicate`] is one rendered filter condition. Field names on the
//! wire are `Key`, `Type`, `Sign` and `Value`.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// One filter condition, already in SQL literal form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Predicate {
    /// Column or field name, operator suffix stripped
    #[serde(rename = "Key")]
    pub key: String,
    /// Cast annotation appended to the key (empty or `::text`)
    #[serde(rename = "Type")]
    pub type_cast: String,
    /// SQL operator, possibly with an array quantifier (`> any`)
    #[serde(rename = "Sign")]
    pub operator: String,
    /// Quoted/escaped SQL literal
    #[serde(rename = "Value")]
    pub value: String,
}

impl Predicate {
    pub fn new(
        key: impl Into<String>,
        type_cast: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            type_cast: type_cast.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decode from JSON. An empty payload or `null` yields the default predicate.
    pub fn from_json_bytes(data: &[u8]) -> serde_json::Result<Self> {
        if data.is_empty() {
            return Ok(Self::default());
        }
        let decoded: Option<Self> = serde_json::from_slice(data)?;
        Ok(decoded.unwrap_or_default())
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {} {}",
            self.key, self.type_cast, self.operator, self.value
        )
    }
}

/// How rendered predicates are combined into one fragment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    fn separator(&self) -> &'static str {
        match self {
            Self::And => " and ",
            Self::Or => " or ",
        }
    }
}

/// Ordered list of independent predicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PredicateList(Vec<Predicate>);

impl PredicateList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bare key, a single predicate, or a whole list
    pub fn add(&mut self, entry: impl Into<ListEntry>) {
        match entry.into() {
            ListEntry::Key(key) => self.0.push(Predicate::new(key, "", "", "")),
            ListEntry::One(predicate) => self.0.push(predicate),
            ListEntry::Many(list) => self.0.extend(list.0),
        }
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.0.push(predicate);
    }

    /// Render every predicate and join them; empty list renders as ""
    pub fn join(&self, conjunction: Conjunction) -> String {
        self.0
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(conjunction.separator())
    }

    pub fn into_inner(self) -> Vec<Predicate> {
        self.0
    }

    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decode from JSON. An empty payload or `null` yields an empty list.
    pub fn from_json_bytes(data: &[u8]) -> serde_json::Result<Self> {
        if data.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(data)
    }
}

impl<'de> Deserialize<'de> for PredicateList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = Option::<Vec<Predicate>>::deserialize(deserializer)?;
        Ok(Self(items.unwrap_or_default()))
    }
}

impl Deref for PredicateList {
    type Target = [Predicate];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Predicate>> for PredicateList {
    fn from(items: Vec<Predicate>) -> Self {
        Self(items)
    }
}

impl FromIterator<Predicate> for PredicateList {
    fn from_iter<I: IntoIterator<Item = Predicate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for PredicateList {
    type Item = Predicate;
    type IntoIter = std::vec::IntoIter<Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PredicateList {
    type Item = &'a Predicate;
    type IntoIter = std::slice::Iter<'a, Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Anything [`PredicateList::add`] accepts
#[derive(Debug, Clone)]
pub enum ListEntry {
    Key(String),
    One(Predicate),
    Many(PredicateList),
}

impl From<&str> for ListEntry {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for ListEntry {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<Predicate> for ListEntry {
    fn from(predicate: Predicate) -> Self {
        Self::One(predicate)
    }
}

impl From<PredicateList> for ListEntry {
    fn from(list: PredicateList) -> Self {
        Self::Many(list)
    }
}

impl From<Vec<Predicate>> for ListEntry {
    fn from(items: Vec<Predicate>) -> Self {
        Self::Many(PredicateList(items))
    }
}

/// Decode a predicate list; an empty payload yields an empty list
pub fn unmarshal(data: &[u8]) -> serde_json::Result<PredicateList> {
    PredicateList::from_json_bytes(data)
}
