//! Evaluator over serialized records.
//!
//! Rust has no runtime reflection; serde is the introspection mechanism
//! instead. Any `T: Serialize` record collapses into a `serde_json::Value`
//! tree once, and this evaluator walks that tree. Field lookups follow the
//! serialized field names, so `#[serde(rename_all = ...)]` and friends
//! apply as usual.

use serde::Serialize;

use crate::ast::Expression;
use crate::evaluation::{BoxEvaluator, EvaluationError, Evaluator, EvaluatorKind};
use crate::evaluators::NullEvaluator;
use crate::value::Value;

/// Exposes a `serde_json::Value` tree to the engine.
///
/// Unlike [`MapEvaluator`](crate::MapEvaluator), descending into a missing
/// or null child yields the [`NullEvaluator`] sentinel rather than absence:
/// a query may drill into structure the record type simply does not have
/// and still evaluate, to `false`.
#[derive(Debug, Clone, Copy)]
pub struct JsonEvaluator<'r> {
	node: &'r serde_json::Value,
}

impl<'r> JsonEvaluator<'r> {
	pub fn new(node: &'r serde_json::Value) -> Self {
		Self { node }
	}
}

impl Expression {
	/// Serializes `record` and matches this query against it.
	///
	/// One-call convenience over [`JsonEvaluator`] for plain data types;
	/// callers matching many queries against one record should serialize
	/// once and reuse a `JsonEvaluator` instead.
	pub fn match_record<T: Serialize>(&self, record: &T) -> Result<bool, EvaluationError> {
		let value = serde_json::to_value(record)
			.map_err(|error| EvaluationError::Serialize(error.to_string()))?;
		self.matches(&JsonEvaluator::new(&value))
	}
}

/// Converts a JSON leaf or subtree into the engine's scalar lattice.
/// JSON numbers take the signed lane when they fit, then unsigned, then
/// float. Nulls convert to `None`: a null can never match a literal.
fn convert(value: &serde_json::Value) -> Option<Value> {
	match value {
		serde_json::Value::Null => None,
		serde_json::Value::Bool(flag) => Some(Value::Bool(*flag)),
		serde_json::Value::Number(number) => {
			if let Some(signed) = number.as_i64() {
				Some(Value::Int(signed))
			} else if let Some(unsigned) = number.as_u64() {
				Some(Value::UInt(unsigned))
			} else {
				number.as_f64().map(Value::Float)
			}
		}
		serde_json::Value::String(text) => Some(Value::Str(text.clone())),
		serde_json::Value::Array(elements) => {
			Some(Value::Array(elements.iter().filter_map(convert).collect()))
		}
		serde_json::Value::Object(map) => Some(Value::Map(
			map.iter()
				.filter_map(|(key, value)| Some((key.clone(), convert(value)?)))
				.collect(),
		)),
	}
}

impl<'r> Evaluator<'r> for JsonEvaluator<'r> {
	fn evaluate(&self, name: &str) -> Result<Option<Value>, EvaluationError> {
		let serde_json::Value::Object(map) = self.node else {
			return Err(EvaluationError::TypeMismatch(format!(
				"cannot read property '{}' of a non-object node",
				name
			)));
		};
		Ok(map.get(name).and_then(convert))
	}

	fn sub_evaluator(&self, name: &str) -> Result<Option<BoxEvaluator<'r>>, EvaluationError> {
		let serde_json::Value::Object(map) = self.node else {
			return Err(EvaluationError::TypeMismatch(format!(
				"cannot descend into property '{}' of a non-object node",
				name
			)));
		};

		match map.get(name) {
			None | Some(serde_json::Value::Null) => Ok(Some(Box::new(NullEvaluator))),
			Some(child @ serde_json::Value::Object(_)) | Some(child @ serde_json::Value::Array(_)) => {
				Ok(Some(Box::new(JsonEvaluator::new(child))))
			}
			Some(other) => Err(EvaluationError::TypeMismatch(format!(
				"property '{}' is expected to be an object or an array, found a scalar: {}",
				name, other
			))),
		}
	}

	fn kind(&self) -> EvaluatorKind {
		match self.node {
			serde_json::Value::Array(_) => EvaluatorKind::Array,
			_ => EvaluatorKind::Object,
		}
	}

	fn array_sub_evaluators(&self) -> Result<Vec<BoxEvaluator<'r>>, EvaluationError> {
		let serde_json::Value::Array(elements) = self.node else {
			return Err(EvaluationError::TypeMismatch(
				"array elements requested from an object node".to_owned(),
			));
		};

		Ok(elements
			.iter()
			.map(|element| Box::new(JsonEvaluator::new(element)) as BoxEvaluator<'r>)
			.collect())
	}
}
