//! Annotation wrappers: list, add, update, delete.
//!
//! Add and update validate the annotation's ranges locally before any network dispatch; a
//! structurally invalid annotation never reaches the transport.

// crates.io
use serde_json::json;
// self
use crate::{
	_prelude::*,
	annotations::{self, Annotation, AnnotationPage},
	client::{Client, ensure_nonzero_id},
	http::Method,
	request::{Params, RequestDescriptor},
};

impl Client {
	/// Returns the annotations on an entry; empty when the call fails.
	pub async fn annotations(
		&self,
		entry_id: i64,
		cancel: &CancellationToken,
	) -> Result<Vec<Annotation>> {
		ensure_nonzero_id(entry_id, "Entry id")?;

		let descriptor = RequestDescriptor::new(Method::Get, format!("/annotations/{entry_id}"));
		let page: AnnotationPage = self.executor().fetch(&descriptor, cancel).await?;

		Ok(page.rows)
	}

	/// Creates an annotation on an entry; `None` when the call fails.
	///
	/// The annotation's ranges are validated first; a [`ValidationError`](crate::error::ValidationError)
	/// surfaces before any network work.
	pub async fn add_annotation(
		&self,
		entry_id: i64,
		annotation: &Annotation,
		cancel: &CancellationToken,
	) -> Result<Option<Annotation>> {
		ensure_nonzero_id(entry_id, "Entry id")?;
		annotations::validate(annotation)?;

		let descriptor =
			RequestDescriptor::new(Method::Post, format!("/annotations/{entry_id}"))
				.with_parameters(annotation_params(annotation));

		self.executor().fetch(&descriptor, cancel).await
	}

	/// Replaces an existing annotation; `None` when the call fails. Ranges are validated first.
	pub async fn update_annotation(
		&self,
		annotation_id: i64,
		annotation: &Annotation,
		cancel: &CancellationToken,
	) -> Result<Option<Annotation>> {
		ensure_nonzero_id(annotation_id, "Annotation id")?;
		annotations::validate(annotation)?;

		let descriptor =
			RequestDescriptor::new(Method::Put, format!("/annotations/{annotation_id}"))
				.with_parameters(annotation_params(annotation));

		self.executor().fetch(&descriptor, cancel).await
	}

	/// Deletes an annotation. `true` only for a 2xx response.
	pub async fn delete_annotation(
		&self,
		annotation_id: i64,
		cancel: &CancellationToken,
	) -> Result<bool> {
		ensure_nonzero_id(annotation_id, "Annotation id")?;

		let descriptor =
			RequestDescriptor::new(Method::Delete, format!("/annotations/{annotation_id}"));

		Ok(self.executor().execute(&descriptor, cancel).await?.is_success())
	}
}

fn annotation_params(annotation: &Annotation) -> Params {
	Params::new()
		.with("text", annotation.text.as_str())
		.with("quote", annotation.quote.as_str())
		.with("ranges", json!(annotation.ranges))
}
