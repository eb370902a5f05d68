//! Annotation models and the structural range validator.
//!
//! Annotations attach highlighted text to an entry. The server identifies the highlighted region
//! by a pair of element selectors of the form `/tag[index]` (e.g. `/p[0]`) plus character
//! offsets. [`validate`] enforces that shape locally so a malformed submission never spends a
//! network round-trip.

// std
use std::sync::LazyLock;

// crates.io
use regex::Regex;
// self
use crate::{
	_prelude::*,
	error::{RangeBound, ValidationError},
};

static BOUND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^/[a-z]+\[\d+\]$").expect("Bound selector pattern should compile.")
});

/// Element range an annotation applies to; validated at submission time, never mutated after.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRange {
	/// Start element selector, expected as `/tag[index]`.
	pub start: String,
	/// Character offset inside the start element.
	#[serde(rename = "startOffset")]
	pub start_offset: i64,
	/// End element selector, expected as `/tag[index]`.
	pub end: String,
	/// Character offset inside the end element.
	#[serde(rename = "endOffset")]
	pub end_offset: i64,
}
impl AnnotationRange {
	/// Creates a range from its bounds and offsets.
	pub fn new(
		start: impl Into<String>,
		start_offset: i64,
		end: impl Into<String>,
		end_offset: i64,
	) -> Self {
		Self { start: start.into(), start_offset, end: end.into(), end_offset }
	}
}

/// An annotation on an entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
	/// Server-assigned annotation id; `0` for annotations not yet submitted.
	#[serde(default)]
	pub id: i64,
	/// Annotator schema version reported by the server.
	#[serde(default, rename = "annotator_schema_version")]
	pub schema_version: Option<String>,
	/// Annotation text.
	#[serde(default)]
	pub text: String,
	/// The quoted (highlighted) passage.
	#[serde(default)]
	pub quote: String,
	/// Creation instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Last update instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
	/// Ranges the annotation applies to; at least one is required at submission time.
	#[serde(default)]
	pub ranges: Vec<AnnotationRange>,
}
impl Annotation {
	/// Creates a new annotation covering the given ranges.
	pub fn new(ranges: Vec<AnnotationRange>, text: impl Into<String>) -> Self {
		Self { text: text.into(), ranges, ..Default::default() }
	}

	/// Sets the quoted passage.
	pub fn with_quote(mut self, quote: impl Into<String>) -> Self {
		self.quote = quote.into();

		self
	}

	/// Returns the single range when exactly one exists.
	pub fn range(&self) -> Option<&AnnotationRange> {
		if self.ranges.len() == 1 { self.ranges.first() } else { None }
	}
}

/// Collection envelope returned by the annotation listing endpoint. The `total` counter the
/// server sends alongside `rows` is redundant with the row count and is ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct AnnotationPage {
	#[serde(default)]
	pub rows: Vec<Annotation>,
}

/// Checks the structural well-formedness of an annotation before submission.
///
/// Pure and side-effect-free. An annotation needs at least one range, and every range's `start`
/// and `end` must match the `/tag[index]` selector form; the error names the bound that failed.
pub fn validate(annotation: &Annotation) -> Result<(), ValidationError> {
	if annotation.ranges.is_empty() {
		return Err(ValidationError::MissingRanges);
	}

	for range in &annotation.ranges {
		check_bound(RangeBound::Start, &range.start)?;
		check_bound(RangeBound::End, &range.end)?;
	}

	Ok(())
}

fn check_bound(bound: RangeBound, value: &str) -> Result<(), ValidationError> {
	if BOUND_PATTERN.is_match(value) {
		Ok(())
	} else {
		Err(ValidationError::MalformedBound { bound, value: value.into() })
	}
}
