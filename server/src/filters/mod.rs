//! Query-string filter translation
//!
//! Translates URL query pairs into SQL predicate fragments. A key may carry
//! a bracketed operator token; the value is quoted and escaped for SQL.
//!
//! | query pair                  | predicate                        |
//! |-----------------------------|----------------------------------|
//! | `age[>-]=18`                | `age >= 18`                      |
//! | `name=O'Brien`              | `name::text = 'O''Brien'`        |
//! | `name[%]=bob`               | `name::text like '%bob%'`        |
//! | `age[!:]=[18{;}30]`         | `age not between 18 and 30`      |
//! | `tags[~*]=any(["a","b"])`   | `tags::text ~* any (array['a', 'b'])` |
//! | `id=null`                   | `id::text is null`               |
//!
//! ## Usage
//!
//! ```
//! use qfilter_server::filters::{Conjunction, FilterPolicy, translate, translate_all};
//!
//! let predicate = translate("age[>-]", "18").unwrap();
//! assert_eq!(predicate.to_string(), "age >= 18");
//!
//! let set = translate_all([("age[>]", "18"), ("name[%]", "bob")], &FilterPolicy::default()).unwrap();
//! assert_eq!(
//!     set.predicates.join(Conjunction::And),
//!     "age > 18 and name::text like '%bob%'"
//! );
//! ```

mod array;
mod error;
mod operator;
mod predicate;
mod set;
mod translate;

pub use array::{ArrayOperation, Quantifier};
pub use error::FilterError;
pub use operator::{Family, Operator, split_key};
pub use predicate::{Conjunction, ListEntry, Predicate, PredicateList, unmarshal};
pub use set::{DEFAULT_MAX_FILTERS, FilterPolicy, FilterSet, OnError, Rejection, translate_all};
pub use translate::{TEXT_CAST, build, translate};
