//! A KQL-style boolean query language over structured records.
//!
//! A query is parsed once into an [`Expression`] and then matched against
//! any number of records. Records are read through the [`Evaluator`]
//! capability; backends are provided for [`Value`] maps
//! ([`MapEvaluator`]) and for anything serde can serialize
//! ([`JsonEvaluator`], [`Expression::match_record`]).
//!
//! The language supports dotted field paths, the comparison operators
//! `:`, `>`, `>=`, `<` and `<=`, grouping with `and`/`or`/`not`, inline
//! sub-object matches (`field:{...}`), set literals (`field:(a or b)`,
//! `field:(a and b)`) and shell-style `*` wildcards in string literals.
//! Matching is read-only and synchronous; a parsed expression is
//! `Send + Sync` and may be shared across threads.
//!
//! ```
//! use kql::{parse, JsonEvaluator};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let query = parse("user.age>=18 and tags:(admin or ops)")?;
//!
//! let record = json!({
//!     "user": { "age": 27 },
//!     "tags": ["ops", "oncall"],
//! });
//! assert!(query.matches(&JsonEvaluator::new(&record))?);
//!
//! // The same compiled query, a different record.
//! let minor = json!({ "user": { "age": 9 }, "tags": ["ops"] });
//! assert!(!query.matches(&JsonEvaluator::new(&minor))?);
//! # Ok(())
//! # }
//! ```

mod ast;
mod comparison;
mod evaluation;
mod evaluators;
mod interpreter;
mod parsing;
mod value;
mod wildcard;

pub use ast::Expression;
pub use evaluation::{BoxEvaluator, EvaluationError, Evaluator, EvaluatorKind};
pub use evaluators::{JsonEvaluator, MapEvaluator, NestedPathEvaluator, NullEvaluator};
pub use parsing::{parse, ParseError};
pub use value::Value;
