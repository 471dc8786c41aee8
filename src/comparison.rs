//! Typed comparison between record values and query literals.
//!
//! A query literal is untyped text; the record value it meets at match time
//! decides the scalar lane. The literal is converted into that lane on
//! first use and the conversion is cached on the AST leaf, tagged by lane,
//! so matching the same expression against many records of one shape
//! converts each literal exactly once.

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::ast::{AtomicValue, ComparisonOperator};
use crate::evaluation::EvaluationError;
use crate::value::Value;

/// A literal converted into a scalar lane. The variant doubles as the
/// cache tag: a cached conversion is reused only when the incoming record
/// value is in the same lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Converted {
	Int(i64),
	UInt(u64),
	Float(f64),
	Bool(bool),
	Timestamp(DateTime<Utc>),
	Duration(Duration),
}

impl AtomicValue {
	/// Compares a record value against this literal under `operation`.
	/// `property` is the dotted path, used only in error messages.
	pub(crate) fn compare(
		&self,
		property: &str,
		value: &Value,
		operation: ComparisonOperator,
	) -> Result<bool, EvaluationError> {
		if self.wildcard.matches_any() {
			return Ok(true);
		}

		match value {
			Value::Str(left) => Ok(match operation {
				ComparisonOperator::Eq => self.wildcard.matches(left),
				_ => compare_ordered(left.as_str(), operation, self.text.as_str()),
			}),
			Value::Int(left) => {
				let right = self.converted_int(property)?;
				Ok(compare_ordered(left, operation, &right))
			}
			Value::UInt(left) => {
				let right = self.converted_uint(property)?;
				Ok(compare_ordered(left, operation, &right))
			}
			Value::Float(left) => {
				let right = self.converted_float(property)?;
				Ok(compare_float(*left, operation, right))
			}
			Value::Bool(left) => {
				let right = self.converted_bool(property)?;
				Ok(compare_bool(*left, operation, right))
			}
			Value::Timestamp(left) => {
				let right = self.converted_timestamp(property)?;
				Ok(compare_ordered(left, operation, &right))
			}
			Value::Duration(left) => {
				let right = self.converted_duration(property)?;
				Ok(compare_ordered(left, operation, &right))
			}
			Value::Array(_) | Value::Map(_) => Err(EvaluationError::UnsupportedType {
				property: property.to_owned(),
				kind: value.kind(),
			}),
		}
	}

	fn converted_int(&self, property: &str) -> Result<i64, EvaluationError> {
		let mut cache = self.converted.lock();
		if let Some(Converted::Int(cached)) = *cache {
			return Ok(cached);
		}
		let parsed = self
			.text
			.parse::<i64>()
			.map_err(|error| self.conversion_error(property, "integer", error.to_string()))?;
		*cache = Some(Converted::Int(parsed));
		Ok(parsed)
	}

	fn converted_uint(&self, property: &str) -> Result<u64, EvaluationError> {
		let mut cache = self.converted.lock();
		if let Some(Converted::UInt(cached)) = *cache {
			return Ok(cached);
		}
		let parsed = self.text.parse::<u64>().map_err(|error| {
			self.conversion_error(property, "unsigned integer", error.to_string())
		})?;
		*cache = Some(Converted::UInt(parsed));
		Ok(parsed)
	}

	fn converted_float(&self, property: &str) -> Result<f64, EvaluationError> {
		let mut cache = self.converted.lock();
		if let Some(Converted::Float(cached)) = *cache {
			return Ok(cached);
		}
		let parsed = self
			.text
			.parse::<f64>()
			.map_err(|error| self.conversion_error(property, "float", error.to_string()))?;
		*cache = Some(Converted::Float(parsed));
		Ok(parsed)
	}

	fn converted_bool(&self, property: &str) -> Result<bool, EvaluationError> {
		let mut cache = self.converted.lock();
		if let Some(Converted::Bool(cached)) = *cache {
			return Ok(cached);
		}
		let parsed = self
			.text
			.parse::<bool>()
			.map_err(|error| self.conversion_error(property, "boolean", error.to_string()))?;
		*cache = Some(Converted::Bool(parsed));
		Ok(parsed)
	}

	fn converted_timestamp(&self, property: &str) -> Result<DateTime<Utc>, EvaluationError> {
		let mut cache = self.converted.lock();
		if let Some(Converted::Timestamp(cached)) = *cache {
			return Ok(cached);
		}
		let parsed = DateTime::parse_from_rfc3339(&self.text)
			.map(|timestamp| timestamp.with_timezone(&Utc))
			.map_err(|error| self.conversion_error(property, "timestamp", error.to_string()))?;
		*cache = Some(Converted::Timestamp(parsed));
		Ok(parsed)
	}

	fn converted_duration(&self, property: &str) -> Result<Duration, EvaluationError> {
		let mut cache = self.converted.lock();
		if let Some(Converted::Duration(cached)) = *cache {
			return Ok(cached);
		}
		let parsed = humantime::parse_duration(&self.text)
			.map_err(|error| self.conversion_error(property, "duration", error.to_string()))?;
		*cache = Some(Converted::Duration(parsed));
		Ok(parsed)
	}

	fn conversion_error(
		&self,
		property: &str,
		target: &'static str,
		message: String,
	) -> EvaluationError {
		EvaluationError::Conversion {
			property: property.to_owned(),
			literal: self.text.clone(),
			target,
			message,
		}
	}
}

/// Compares two values of an `Ord` lane using the given operator.
fn compare_ordered<T: Ord + ?Sized>(left: &T, operation: ComparisonOperator, right: &T) -> bool {
	match operation {
		ComparisonOperator::Eq => left == right,
		ComparisonOperator::Gt => left > right,
		ComparisonOperator::Gte => left >= right,
		ComparisonOperator::Lt => left < right,
		ComparisonOperator::Lte => left <= right,
	}
}

// Raw IEEE-754 comparison: NaN makes every operator false, and zero
// compares equal to negative zero.
fn compare_float(left: f64, operation: ComparisonOperator, right: f64) -> bool {
	match operation {
		ComparisonOperator::Eq => left == right,
		ComparisonOperator::Gt => left > right,
		ComparisonOperator::Gte => left >= right,
		ComparisonOperator::Lt => left < right,
		ComparisonOperator::Lte => left <= right,
	}
}

// Booleans order false < true: greater means "left and not right".
fn compare_bool(left: bool, operation: ComparisonOperator, right: bool) -> bool {
	match operation {
		ComparisonOperator::Eq => left == right,
		ComparisonOperator::Gt => left && !right,
		ComparisonOperator::Gte => (left && !right) || left == right,
		ComparisonOperator::Lt => !left && right,
		ComparisonOperator::Lte => (!left && right) || left == right,
	}
}
