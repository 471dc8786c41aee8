//! This module contains the `Evaluator` trait and the `EvaluationError` enum.
//! The `Evaluator` trait is the capability through which the engine reads a
//! record: look up a named property, descend into a named child, and
//! enumerate the elements of an array node. Implementations adapt concrete
//! data models (value maps, serialized records) behind this interface.

use thiserror::Error;

use crate::value::Value;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum EvaluationError {
	#[error("type mismatch: {0}")]
	TypeMismatch(String),
	#[error("cannot convert '{literal}' to {target} for property '{property}': {message}")]
	Conversion {
		property: String,
		literal: String,
		target: &'static str,
		message: String,
	},
	#[error("unsupported type '{kind}' of property '{property}'")]
	UnsupportedType {
		property: String,
		kind: &'static str,
	},
	#[error("property '{property}' is expected to be an array")]
	NotAnArray { property: String },
	#[error("failed to serialize record: {0}")]
	Serialize(String),
}

/// The shape of the record node behind an evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluatorKind {
	Object,
	Array,
}

/// Boxed evaluator tied to the borrowed record data, not to the evaluator
/// that produced it.
pub type BoxEvaluator<'r> = Box<dyn Evaluator<'r> + 'r>;

/// Read access to one node of a record.
///
/// The lifetime `'r` is the record data itself. Sub-evaluators borrow from
/// the record, never from their parent evaluator, so a drill-down can drop
/// intermediate evaluators as it walks. Absence is reported as `None` and
/// is never an error; errors are reserved for shape and type conflicts.
pub trait Evaluator<'r> {
	/// Looks up a single-segment property on this node.
	fn evaluate(&self, name: &str) -> Result<Option<Value>, EvaluationError>;

	/// Returns an evaluator for the named child, or `None` when the record
	/// has no such child.
	fn sub_evaluator(&self, name: &str) -> Result<Option<BoxEvaluator<'r>>, EvaluationError>;

	/// The shape of this node.
	fn kind(&self) -> EvaluatorKind;

	/// Per-element evaluators of an array node; an error for object nodes.
	fn array_sub_evaluators(&self) -> Result<Vec<BoxEvaluator<'r>>, EvaluationError>;
}

impl<'a, 'r, E: Evaluator<'r> + ?Sized> Evaluator<'r> for &'a E {
	fn evaluate(&self, name: &str) -> Result<Option<Value>, EvaluationError> {
		(**self).evaluate(name)
	}

	fn sub_evaluator(&self, name: &str) -> Result<Option<BoxEvaluator<'r>>, EvaluationError> {
		(**self).sub_evaluator(name)
	}

	fn kind(&self) -> EvaluatorKind {
		(**self).kind()
	}

	fn array_sub_evaluators(&self) -> Result<Vec<BoxEvaluator<'r>>, EvaluationError> {
		(**self).array_sub_evaluators()
	}
}
