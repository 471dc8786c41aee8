//! The absent-structure sentinel.

use crate::evaluation::{BoxEvaluator, EvaluationError, Evaluator, EvaluatorKind};
use crate::value::Value;

/// An object with no properties.
///
/// Stands in for structure a record does not have: every lookup is absent,
/// every descent yields another null evaluator, and nothing fails. Matching
/// into it can only produce `false` (or `true` under negation), which is
/// exactly the semantics of drilling into a missing branch of a record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEvaluator;

impl<'r> Evaluator<'r> for NullEvaluator {
	fn evaluate(&self, _name: &str) -> Result<Option<Value>, EvaluationError> {
		Ok(None)
	}

	fn sub_evaluator(&self, _name: &str) -> Result<Option<BoxEvaluator<'r>>, EvaluationError> {
		Ok(Some(Box::new(NullEvaluator)))
	}

	fn kind(&self) -> EvaluatorKind {
		EvaluatorKind::Object
	}

	fn array_sub_evaluators(&self) -> Result<Vec<BoxEvaluator<'r>>, EvaluationError> {
		Err(EvaluationError::TypeMismatch(
			"array elements requested from an object node".to_owned(),
		))
	}
}
