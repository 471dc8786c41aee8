//! This module defines the abstract syntax tree (AST) for parsed queries.
//!
//! The tree mirrors the grammar: a query is a disjunction of conjunctions
//! of (possibly negated) sub-expressions, each of which is either a
//! parenthesised group or a single property match. The tree is built once
//! by [`parse`](crate::parse) and is logically immutable afterwards; the
//! only interior state is the comparator cache on each [`AtomicValue`].

use parking_lot::Mutex;
use std::fmt;
use std::str::FromStr;

use crate::comparison::Converted;
use crate::parsing::{self, ParseError};
use crate::wildcard::Wildcard;

/// A parsed query, ready to be matched against records.
///
/// Parse once, match many times: the per-literal conversion cache makes
/// repeated matches against records of the same shape cheap. The tree is
/// `Send + Sync`; concurrent matches race only on the cache, where the
/// last writer wins and every writer computes the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
	pub(crate) root: Disjunction,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Disjunction {
	pub(crate) first: Conjunction,
	pub(crate) rest: Vec<Conjunction>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Conjunction {
	pub(crate) first: SubExpression,
	pub(crate) rest: Vec<SubExpression>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SubExpression {
	pub(crate) negated: bool,
	pub(crate) term: Term,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Term {
	Grouped(Box<Disjunction>),
	Property(PropertyMatch),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComparisonOperator {
	Eq,
	Gt,
	Gte,
	Lt,
	Lte,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PropertyMatch {
	/// Dotted path split into segments; never empty.
	pub(crate) path: Vec<String>,
	pub(crate) operation: ComparisonOperator,
	pub(crate) payload: MatchPayload,
}

impl PropertyMatch {
	pub(crate) fn dotted_path(&self) -> String {
		self.path.join(".")
	}
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MatchPayload {
	Atomic(AtomicValue),
	Nested(Box<Disjunction>),
	AnyOf(Vec<AtomicValue>),
	AllOf(Vec<AtomicValue>),
}

/// A literal occurrence in a query: the unquoted text, its pre-compiled
/// wildcard, and the lazily converted typed value from the last match.
#[derive(Debug)]
pub(crate) struct AtomicValue {
	pub(crate) text: String,
	pub(crate) wildcard: Wildcard,
	pub(crate) converted: Mutex<Option<Converted>>,
}

impl AtomicValue {
	pub(crate) fn new(text: impl Into<String>) -> Self {
		let text = text.into();
		let wildcard = Wildcard::compile(&text);
		Self {
			text,
			wildcard,
			converted: Mutex::new(None),
		}
	}
}

impl Clone for AtomicValue {
	fn clone(&self) -> Self {
		Self {
			text: self.text.clone(),
			wildcard: self.wildcard.clone(),
			converted: Mutex::new(*self.converted.lock()),
		}
	}
}

impl PartialEq for AtomicValue {
	fn eq(&self, other: &Self) -> bool {
		// The cache is derived state and does not take part in equality.
		self.text == other.text
	}
}

impl Expression {
	/// Parses a query string. Equivalent to [`crate::parse`].
	pub fn parse(query: &str) -> Result<Self, ParseError> {
		parsing::parse(query)
	}
}

impl FromStr for Expression {
	type Err = ParseError;

	fn from_str(query: &str) -> Result<Self, Self::Err> {
		parsing::parse(query)
	}
}

// Canonical reconstruction: every `and`/`or` group with more than one
// operand is parenthesised and atomic values print unquoted. The output is
// not the original input, but it reparses to itself.

impl fmt::Display for Expression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.root)
	}
}

impl fmt::Display for Disjunction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.rest.is_empty() {
			return write!(f, "{}", self.first);
		}
		write!(f, "({}", self.first)?;
		for conjunction in &self.rest {
			write!(f, " or {}", conjunction)?;
		}
		write!(f, ")")
	}
}

impl fmt::Display for Conjunction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.rest.is_empty() {
			return write!(f, "{}", self.first);
		}
		write!(f, "({}", self.first)?;
		for sub_expression in &self.rest {
			write!(f, " and {}", sub_expression)?;
		}
		write!(f, ")")
	}
}

impl fmt::Display for SubExpression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.negated {
			write!(f, "not ")?;
		}
		match &self.term {
			Term::Grouped(disjunction) => write!(f, "{}", disjunction),
			Term::Property(property) => write!(f, "{}", property),
		}
	}
}

impl fmt::Display for PropertyMatch {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}", self.dotted_path(), self.operation)?;
		match &self.payload {
			MatchPayload::Atomic(atomic) => write!(f, "{}", atomic),
			MatchPayload::Nested(inner) => write!(f, "{{{}}}", inner),
			MatchPayload::AnyOf(values) => write_set(f, values, " or "),
			MatchPayload::AllOf(values) => write_set(f, values, " and "),
		}
	}
}

fn write_set(f: &mut fmt::Formatter<'_>, values: &[AtomicValue], joiner: &str) -> fmt::Result {
	write!(f, "(")?;
	for (index, value) in values.iter().enumerate() {
		if index > 0 {
			f.write_str(joiner)?;
		}
		write!(f, "{}", value)?;
	}
	write!(f, ")")
}

impl fmt::Display for ComparisonOperator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ComparisonOperator::Eq => ":",
			ComparisonOperator::Gt => ">",
			ComparisonOperator::Gte => ">=",
			ComparisonOperator::Lt => "<",
			ComparisonOperator::Lte => "<=",
		})
	}
}

impl fmt::Display for AtomicValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.text)
	}
}
