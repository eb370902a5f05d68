//! Ordered request parameters and the service's method-dependent encodings.
//!
//! The remote service predates native JSON booleans in its API surface: every boolean parameter
//! travels as the integer `0` or `1`, in query strings and JSON bodies alike. The encoding is
//! made explicit here, at the call site, instead of hiding behind serializer type introspection.

// crates.io
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

/// A single parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
	/// Boolean, encoded as `1`/`0` on the wire.
	Bool(bool),
	/// Signed integer.
	Int(i64),
	/// Floating-point number.
	Float(f64),
	/// Plain string.
	Str(String),
	/// Pre-built JSON value, passed through untouched (e.g. annotation ranges).
	Json(JsonValue),
}
impl ParamValue {
	/// Renders the value for a query-string pair.
	fn query_fragment(&self) -> String {
		match self {
			ParamValue::Bool(value) => if *value { "1" } else { "0" }.into(),
			ParamValue::Int(value) => value.to_string(),
			ParamValue::Float(value) => value.to_string(),
			ParamValue::Str(value) => value.clone(),
			ParamValue::Json(value) => value.to_string(),
		}
	}

	/// Renders the value for a JSON body, applying the numeric-boolean convention.
	fn json_value(&self) -> JsonValue {
		match self {
			ParamValue::Bool(value) => JsonValue::Number(u8::from(*value).into()),
			ParamValue::Int(value) => JsonValue::Number((*value).into()),
			ParamValue::Float(value) =>
				JsonNumber::from_f64(*value).map(JsonValue::Number).unwrap_or(JsonValue::Null),
			ParamValue::Str(value) => JsonValue::String(value.clone()),
			ParamValue::Json(value) => value.clone(),
		}
	}
}
impl From<bool> for ParamValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}
impl From<i64> for ParamValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}
impl From<i32> for ParamValue {
	fn from(value: i32) -> Self {
		Self::Int(value.into())
	}
}
impl From<f64> for ParamValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}
impl From<&str> for ParamValue {
	fn from(value: &str) -> Self {
		Self::Str(value.into())
	}
}
impl From<String> for ParamValue {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}
impl From<JsonValue> for ParamValue {
	fn from(value: JsonValue) -> Self {
		Self::Json(value)
	}
}

/// Ordered `key -> value` mapping submitted along with a request.
///
/// Insertion order is part of the wire contract for `GET` requests: keys are appended to the
/// query string exactly in the order they were added.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params(Vec<(String, ParamValue)>);
impl Params {
	/// Creates an empty parameter map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a parameter, or replaces the value in place if the key already exists.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
		let key = key.into();
		let value = value.into();

		if let Some(existing) = self.0.iter_mut().find(|(k, _)| *k == key) {
			existing.1 = value;
		} else {
			self.0.push((key, value));
		}
	}

	/// Builder-style [`insert`](Self::insert).
	pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
		self.insert(key, value);

		self
	}

	/// Returns `true` when no parameter has been added.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Number of parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Looks up a parameter by key.
	pub fn get(&self, key: &str) -> Option<&ParamValue> {
		self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	/// Iterates over `(key, value)` pairs in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Encodes the map as `key=value` pairs joined with `&`, keys in insertion order, booleans as
	/// `1`/`0`, no trailing separator. Values are emitted verbatim, matching the service's legacy
	/// query convention.
	pub fn query_string(&self) -> String {
		let mut buf = String::new();

		for (idx, (key, value)) in self.0.iter().enumerate() {
			if idx > 0 {
				buf.push('&');
			}

			buf.push_str(key);
			buf.push('=');
			buf.push_str(&value.query_fragment());
		}

		buf
	}

	/// Encodes the map as a single JSON object with booleans as the integers `1`/`0`.
	pub fn json_body(&self) -> JsonValue {
		let mut map = JsonMap::new();

		for (key, value) in &self.0 {
			map.insert(key.clone(), value.json_value());
		}

		JsonValue::Object(map)
	}
}
