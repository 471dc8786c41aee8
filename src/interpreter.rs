//! Tree-walking evaluation of parsed queries against a record.
//!
//! Boolean folds short-circuit strictly left to right and the first error
//! wins. Absence — a missing property or an unresolvable drill-down step —
//! evaluates to `false` and is never an error.

use crate::ast::{
	AtomicValue, ComparisonOperator, Conjunction, Disjunction, Expression, MatchPayload,
	PropertyMatch, SubExpression, Term,
};
use crate::evaluation::{BoxEvaluator, EvaluationError, Evaluator, EvaluatorKind};
use crate::value::Value;

impl Expression {
	/// Evaluates this query against one record.
	///
	/// The evaluator is borrowed for the duration of the call; nothing is
	/// retained. A single parsed expression may be matched against many
	/// records, concurrently if desired.
	pub fn matches<'r>(&self, evaluator: &dyn Evaluator<'r>) -> Result<bool, EvaluationError> {
		self.root.matches(evaluator)
	}
}

impl Disjunction {
	pub(crate) fn matches<'r>(
		&self,
		evaluator: &dyn Evaluator<'r>,
	) -> Result<bool, EvaluationError> {
		let mut result = self.first.matches(evaluator)?;
		for operand in &self.rest {
			if result {
				return Ok(true);
			}
			result = operand.matches(evaluator)?;
		}
		Ok(result)
	}
}

impl Conjunction {
	fn matches<'r>(&self, evaluator: &dyn Evaluator<'r>) -> Result<bool, EvaluationError> {
		let mut result = self.first.matches(evaluator)?;
		for operand in &self.rest {
			if !result {
				return Ok(false);
			}
			result = operand.matches(evaluator)?;
		}
		Ok(result)
	}
}

impl SubExpression {
	fn matches<'r>(&self, evaluator: &dyn Evaluator<'r>) -> Result<bool, EvaluationError> {
		let result = match &self.term {
			Term::Grouped(inner) => inner.matches(evaluator)?,
			Term::Property(property) => property.matches(evaluator)?,
		};
		Ok(result != self.negated)
	}
}

impl PropertyMatch {
	fn matches<'r>(&self, evaluator: &dyn Evaluator<'r>) -> Result<bool, EvaluationError> {
		tracing::trace!(
			property = %self.dotted_path(),
			operation = %self.operation,
			"evaluating property match"
		);

		match &self.payload {
			MatchPayload::Atomic(atomic) => self.match_atomic(evaluator, atomic),
			MatchPayload::Nested(inner) => self.match_nested(evaluator, inner),
			MatchPayload::AnyOf(values) => self.match_any_of(evaluator, values),
			MatchPayload::AllOf(values) => self.match_all_of(evaluator, values),
		}
	}

	fn match_atomic<'r>(
		&self,
		evaluator: &dyn Evaluator<'r>,
		atomic: &AtomicValue,
	) -> Result<bool, EvaluationError> {
		let Some(value) = resolve_property(evaluator, &self.path)? else {
			return Ok(false);
		};
		let property = self.dotted_path();

		match &value {
			// An array-valued property matches existentially, by equality
			// whatever the written operator.
			Value::Array(elements) => {
				for element in elements {
					if atomic.compare(&property, element, ComparisonOperator::Eq)? {
						return Ok(true);
					}
				}
				Ok(false)
			}
			scalar => atomic.compare(&property, scalar, self.operation),
		}
	}

	fn match_nested<'r>(
		&self,
		evaluator: &dyn Evaluator<'r>,
		inner: &Disjunction,
	) -> Result<bool, EvaluationError> {
		let Some(target) = resolve_sub_evaluator(evaluator, &self.path)? else {
			return Ok(false);
		};

		match target.kind() {
			EvaluatorKind::Object => inner.matches(&*target),
			// "exists an element such that ..." over arrays of records.
			EvaluatorKind::Array => {
				for element in target.array_sub_evaluators()? {
					if inner.matches(&*element)? {
						return Ok(true);
					}
				}
				Ok(false)
			}
		}
	}

	fn match_any_of<'r>(
		&self,
		evaluator: &dyn Evaluator<'r>,
		values: &[AtomicValue],
	) -> Result<bool, EvaluationError> {
		let Some(value) = resolve_property(evaluator, &self.path)? else {
			return Ok(false);
		};
		let property = self.dotted_path();

		match &value {
			Value::Array(elements) => {
				for element in elements {
					for candidate in values {
						if candidate.compare(&property, element, ComparisonOperator::Eq)? {
							return Ok(true);
						}
					}
				}
				Ok(false)
			}
			scalar => {
				for candidate in values {
					if candidate.compare(&property, scalar, ComparisonOperator::Eq)? {
						return Ok(true);
					}
				}
				Ok(false)
			}
		}
	}

	fn match_all_of<'r>(
		&self,
		evaluator: &dyn Evaluator<'r>,
		values: &[AtomicValue],
	) -> Result<bool, EvaluationError> {
		let Some(value) = resolve_property(evaluator, &self.path)? else {
			return Ok(false);
		};
		let property = self.dotted_path();

		let Value::Array(elements) = &value else {
			return Err(EvaluationError::NotAnArray { property });
		};

		for candidate in values {
			let mut found = false;
			for element in elements {
				if candidate.compare(&property, element, ComparisonOperator::Eq)? {
					found = true;
					break;
				}
			}
			if !found {
				return Ok(false);
			}
		}
		Ok(true)
	}
}

/// Resolves the value of a dotted property: all but the last segment drill
/// through sub-evaluators, the last is looked up as a plain property.
fn resolve_property<'r>(
	evaluator: &dyn Evaluator<'r>,
	path: &[String],
) -> Result<Option<Value>, EvaluationError> {
	let Some((last, prefix)) = path.split_last() else {
		return Ok(None);
	};
	if prefix.is_empty() {
		return evaluator.evaluate(last);
	}
	let Some(target) = resolve_sub_evaluator(evaluator, prefix)? else {
		return Ok(None);
	};
	target.evaluate(last)
}

/// Walks every segment of a dotted path through sub-evaluators. `None` at
/// any step means the record has no such structure.
fn resolve_sub_evaluator<'r>(
	evaluator: &dyn Evaluator<'r>,
	path: &[String],
) -> Result<Option<BoxEvaluator<'r>>, EvaluationError> {
	let Some((first, rest)) = path.split_first() else {
		return Ok(None);
	};
	let Some(mut current) = evaluator.sub_evaluator(first)? else {
		return Ok(None);
	};
	for segment in rest {
		let Some(next) = current.sub_evaluator(segment)? else {
			return Ok(None);
		};
		current = next;
	}
	Ok(Some(current))
}
