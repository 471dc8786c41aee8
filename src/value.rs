//! The scalar lattice records expose to the engine.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;

/// A property value produced by an [`Evaluator`](crate::Evaluator).
///
/// Narrow numeric types widen into the 64-bit lanes through the `From`
/// impls; signed and unsigned integers stay in separate lanes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Str(String),
	Int(i64),
	UInt(u64),
	Float(f64),
	Bool(bool),
	Timestamp(DateTime<Utc>),
	Duration(Duration),
	Array(Vec<Value>),
	Map(HashMap<String, Value>),
}

impl Value {
	/// Lane name used in error messages.
	pub fn kind(&self) -> &'static str {
		match self {
			Value::Str(_) => "string",
			Value::Int(_) => "integer",
			Value::UInt(_) => "unsigned integer",
			Value::Float(_) => "float",
			Value::Bool(_) => "boolean",
			Value::Timestamp(_) => "timestamp",
			Value::Duration(_) => "duration",
			Value::Array(_) => "array",
			Value::Map(_) => "object",
		}
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::Str(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::Str(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

impl From<DateTime<Utc>> for Value {
	fn from(value: DateTime<Utc>) -> Self {
		Value::Timestamp(value)
	}
}

impl From<Duration> for Value {
	fn from(value: Duration) -> Self {
		Value::Duration(value)
	}
}

macro_rules! value_from_int {
	($variant:ident: $($ty:ty),+) => {
		$(impl From<$ty> for Value {
			fn from(value: $ty) -> Self {
				Value::$variant(value.into())
			}
		})+
	};
}

value_from_int!(Int: i8, i16, i32, i64);
value_from_int!(UInt: u8, u16, u32, u64);
value_from_int!(Float: f32, f64);

impl From<isize> for Value {
	fn from(value: isize) -> Self {
		Value::Int(value as i64)
	}
}

impl From<usize> for Value {
	fn from(value: usize) -> Self {
		Value::UInt(value as u64)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(values: Vec<T>) -> Self {
		Value::Array(values.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
	fn from(map: HashMap<String, T>) -> Self {
		Value::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
	}
}

impl<T: Into<Value>> From<HashMap<&str, T>> for Value {
	fn from(map: HashMap<&str, T>) -> Self {
		Value::Map(map.into_iter().map(|(k, v)| (k.to_owned(), v.into())).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_integer_widening_keeps_lanes_separate() {
		assert_eq!(Value::from(42i8), Value::Int(42));
		assert_eq!(Value::from(42i32), Value::Int(42));
		assert_eq!(Value::from(42u8), Value::UInt(42));
		assert_eq!(Value::from(42u32), Value::UInt(42));
		assert_ne!(Value::from(42i32), Value::from(42u32));
	}

	#[test]
	fn test_float_widening() {
		assert_eq!(Value::from(1.5f32), Value::Float(1.5));
	}

	#[test]
	fn test_collection_conversions() {
		assert_eq!(
			Value::from(vec![1i32, 2, 3]),
			Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
		);

		let map = HashMap::from([("a", 1i64)]);
		let Value::Map(converted) = Value::from(map) else {
			panic!("expected a map");
		};
		assert_eq!(converted.get("a"), Some(&Value::Int(1)));
	}
}
