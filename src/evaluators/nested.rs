//! Dotted-path decorator for flattened keys.

use crate::evaluation::{BoxEvaluator, EvaluationError, Evaluator, EvaluatorKind};
use crate::value::Value;

/// Accepts dotted names on lookup operations and descends the wrapped
/// evaluator segment by segment.
///
/// When an intermediate segment is not resolvable as a sub-evaluator, the
/// remaining path is handed as one compound name to the last reachable
/// evaluator. Records that flatten nested structure into keys containing
/// literal dots (`{"a": {"b.c": 1}}`) resolve either way:
///
/// - `a.b.c` over `{"a": {"b": {"c": 1}}}` descends all three segments;
/// - `a.b.c` over `{"a": {"b.c": 1}}` descends into `a`, fails to find
///   `b`, and falls back to the compound key `b.c` there.
///
/// The query engine itself splits dotted paths before it reaches any
/// evaluator; this decorator is for hosts resolving dotted names through
/// the evaluator interface directly.
pub struct NestedPathEvaluator<'r> {
	inner: BoxEvaluator<'r>,
}

/// Where a dotted descent ended: on a resolved sub-evaluator, or still on
/// the wrapped root.
enum Reached<'r> {
	Root,
	Sub(BoxEvaluator<'r>),
}

impl<'r> NestedPathEvaluator<'r> {
	pub fn new(inner: impl Evaluator<'r> + 'r) -> Self {
		Self {
			inner: Box::new(inner),
		}
	}

	/// Descends all but the last segment of `name`. Returns the evaluator
	/// to finish on and the (possibly compound) property name to finish
	/// with.
	fn descend(&self, name: &str) -> Result<(Reached<'r>, String), EvaluationError> {
		let mut parts: Vec<&str> = name.split('.').collect();
		let last = parts.pop().unwrap_or_default();
		let mut reached = Reached::Root;

		for (index, part) in parts.iter().enumerate() {
			let target: &dyn Evaluator<'r> = match &reached {
				Reached::Sub(evaluator) => &**evaluator,
				Reached::Root => &*self.inner,
			};
			match target.sub_evaluator(part)? {
				Some(next) => reached = Reached::Sub(next),
				// Unresolvable segment: the remainder becomes one
				// compound name on the evaluator reached so far.
				None => {
					let mut remainder = parts[index..].join(".");
					remainder.push('.');
					remainder.push_str(last);
					return Ok((reached, remainder));
				}
			}
		}

		Ok((reached, last.to_owned()))
	}
}

impl<'r> Evaluator<'r> for NestedPathEvaluator<'r> {
	fn evaluate(&self, name: &str) -> Result<Option<Value>, EvaluationError> {
		let (reached, property) = self.descend(name)?;
		match reached {
			Reached::Sub(evaluator) => evaluator.evaluate(&property),
			Reached::Root => self.inner.evaluate(&property),
		}
	}

	fn sub_evaluator(&self, name: &str) -> Result<Option<BoxEvaluator<'r>>, EvaluationError> {
		let (reached, property) = self.descend(name)?;
		match reached {
			Reached::Sub(evaluator) => evaluator.sub_evaluator(&property),
			Reached::Root => self.inner.sub_evaluator(&property),
		}
	}

	fn kind(&self) -> EvaluatorKind {
		self.inner.kind()
	}

	fn array_sub_evaluators(&self) -> Result<Vec<BoxEvaluator<'r>>, EvaluationError> {
		self.inner.array_sub_evaluators()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::evaluators::MapEvaluator;
	use crate::value::Value;
	use std::collections::HashMap;

	fn nested_record() -> HashMap<String, Value> {
		HashMap::from([(
			"a".to_owned(),
			Value::from(HashMap::from([(
				"b",
				Value::from(HashMap::from([("c", 1i64)])),
			)])),
		)])
	}

	fn flattened_record() -> HashMap<String, Value> {
		HashMap::from([(
			"a".to_owned(),
			Value::from(HashMap::from([("b.c", 1i64)])),
		)])
	}

	#[test]
	fn test_fully_nested_paths_descend_every_segment() {
		let record = nested_record();
		let evaluator = NestedPathEvaluator::new(MapEvaluator::new(&record));
		assert_eq!(evaluator.evaluate("a.b.c"), Ok(Some(Value::Int(1))));
	}

	#[test]
	fn test_unresolvable_segment_falls_back_to_compound_key() {
		let record = flattened_record();
		let evaluator = NestedPathEvaluator::new(MapEvaluator::new(&record));
		assert_eq!(evaluator.evaluate("a.b.c"), Ok(Some(Value::Int(1))));
	}

	#[test]
	fn test_fully_absent_path_is_absent() {
		let record = nested_record();
		let evaluator = NestedPathEvaluator::new(MapEvaluator::new(&record));
		assert_eq!(evaluator.evaluate("x.y"), Ok(None));
	}

	#[test]
	fn test_dotted_sub_evaluator_resolution() {
		let record = nested_record();
		let evaluator = NestedPathEvaluator::new(MapEvaluator::new(&record));
		let target = evaluator.sub_evaluator("a.b").unwrap().unwrap();
		assert_eq!(target.evaluate("c"), Ok(Some(Value::Int(1))));
	}

	#[test]
	fn test_single_segment_names_pass_through() {
		let record = nested_record();
		let evaluator = NestedPathEvaluator::new(MapEvaluator::new(&record));
		assert_eq!(evaluator.kind(), EvaluatorKind::Object);
		assert_eq!(evaluator.evaluate("a"), evaluator.inner.evaluate("a"));
	}
}
