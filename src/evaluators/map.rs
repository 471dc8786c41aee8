//! Evaluator over hierarchical [`Value`] maps.

use std::collections::HashMap;

use crate::evaluation::{BoxEvaluator, EvaluationError, Evaluator, EvaluatorKind};
use crate::value::Value;

/// Exposes a `HashMap<String, Value>` tree to the engine.
///
/// An object node wraps a key-to-value map; an array node wraps an ordered
/// sequence of element objects. Descending into a child picks the mode
/// from the child's shape: a map becomes an object node, an array whose
/// elements are all maps becomes an array node, and anything else is a
/// type mismatch. A missing key is absence, not an error.
#[derive(Debug, Clone, Copy)]
pub struct MapEvaluator<'r> {
	node: MapNode<'r>,
}

#[derive(Debug, Clone, Copy)]
enum MapNode<'r> {
	Object(&'r HashMap<String, Value>),
	Array(&'r [Value]),
}

impl<'r> MapEvaluator<'r> {
	/// Wraps a map as an object node.
	pub fn new(map: &'r HashMap<String, Value>) -> Self {
		Self {
			node: MapNode::Object(map),
		}
	}

	/// Wraps a sequence of element objects as an array node.
	pub fn from_elements(elements: &'r [Value]) -> Self {
		Self {
			node: MapNode::Array(elements),
		}
	}
}

impl<'r> Evaluator<'r> for MapEvaluator<'r> {
	fn evaluate(&self, name: &str) -> Result<Option<Value>, EvaluationError> {
		match self.node {
			MapNode::Object(map) => Ok(map.get(name).cloned()),
			MapNode::Array(_) => Err(EvaluationError::TypeMismatch(format!(
				"cannot read property '{}' of an array node",
				name
			))),
		}
	}

	fn sub_evaluator(&self, name: &str) -> Result<Option<BoxEvaluator<'r>>, EvaluationError> {
		let MapNode::Object(map) = self.node else {
			return Err(EvaluationError::TypeMismatch(format!(
				"cannot descend into property '{}' of an array node",
				name
			)));
		};

		match map.get(name) {
			None => Ok(None),
			Some(Value::Map(child)) => Ok(Some(Box::new(MapEvaluator {
				node: MapNode::Object(child),
			}))),
			Some(Value::Array(elements)) => {
				if let Some(element) = elements.iter().find(|e| !matches!(e, Value::Map(_))) {
					return Err(EvaluationError::TypeMismatch(format!(
						"property '{}' is an array of {}, not of objects",
						name,
						element.kind()
					)));
				}
				Ok(Some(Box::new(MapEvaluator {
					node: MapNode::Array(elements),
				})))
			}
			Some(other) => Err(EvaluationError::TypeMismatch(format!(
				"property '{}' is expected to be an object or an array of objects, found {}",
				name,
				other.kind()
			))),
		}
	}

	fn kind(&self) -> EvaluatorKind {
		match self.node {
			MapNode::Object(_) => EvaluatorKind::Object,
			MapNode::Array(_) => EvaluatorKind::Array,
		}
	}

	fn array_sub_evaluators(&self) -> Result<Vec<BoxEvaluator<'r>>, EvaluationError> {
		let MapNode::Array(elements) = self.node else {
			return Err(EvaluationError::TypeMismatch(
				"array elements requested from an object node".to_owned(),
			));
		};

		elements
			.iter()
			.map(|element| match element {
				Value::Map(map) => {
					Ok(Box::new(MapEvaluator::new(map)) as BoxEvaluator<'r>)
				}
				other => Err(EvaluationError::TypeMismatch(format!(
					"array element is expected to be an object, found {}",
					other.kind()
				))),
			})
			.collect()
	}
}
