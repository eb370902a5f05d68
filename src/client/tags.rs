//! Tag wrappers: list, attach, detach, delete everywhere.

// self
use crate::{
	_prelude::*,
	client::{Client, ensure_nonzero_id},
	http::Method,
	models::{Entry, Tag},
	request::{Params, RequestDescriptor},
};

impl Client {
	/// Returns every tag known to the server; empty when the call fails.
	pub async fn tags(&self, cancel: &CancellationToken) -> Result<Vec<Tag>> {
		let descriptor = RequestDescriptor::new(Method::Get, "/tags");

		self.executor().fetch(&descriptor, cancel).await
	}

	/// Attaches tags to an entry, returning the entry's full tag list (with server-assigned ids).
	///
	/// `None` when the call fails or when any requested label is missing from the returned entry,
	/// so a partial attach is never reported as success.
	pub async fn add_tags(
		&self,
		entry_id: i64,
		tags: &[&str],
		cancel: &CancellationToken,
	) -> Result<Option<Vec<Tag>>> {
		ensure_nonzero_id(entry_id, "Entry id")?;

		let descriptor =
			RequestDescriptor::new(Method::Post, format!("/entries/{entry_id}/tags"))
				.with_parameters(Params::new().with("tags", tags.join(",")));
		let entry: Option<Entry> = self.executor().fetch(&descriptor, cancel).await?;
		let Some(entry) = entry else { return Ok(None) };

		for requested in tags {
			if entry.tags.iter().filter(|tag| tag.label == *requested).count() != 1 {
				return Ok(None);
			}
		}

		Ok(Some(entry.tags))
	}

	/// Detaches tags from an entry, one `DELETE` per tag.
	///
	/// `false` as soon as one removal fails, or when any label still appears on the entry
	/// returned by the last removal.
	pub async fn remove_tags(
		&self,
		entry_id: i64,
		tags: &[Tag],
		cancel: &CancellationToken,
	) -> Result<bool> {
		ensure_nonzero_id(entry_id, "Entry id")?;

		let mut last_body = String::new();

		for tag in tags {
			let descriptor = RequestDescriptor::new(
				Method::Delete,
				format!("/entries/{entry_id}/tags/{}", tag.id),
			);

			match self.executor().execute(&descriptor, cancel).await? {
				crate::request::RequestOutcome::Success { body, .. } => last_body = body,
				_ => return Ok(false),
			}
		}

		let entry: Option<Entry> = crate::request::decode_body(&last_body);
		let Some(entry) = entry else { return Ok(true) };

		for removed in tags {
			if entry.tags.iter().any(|tag| tag.label == removed.label) {
				return Ok(false);
			}
		}

		Ok(true)
	}

	/// Removes a tag from every entry. `true` only for a 2xx response.
	pub async fn remove_tag_everywhere(
		&self,
		tag: &Tag,
		cancel: &CancellationToken,
	) -> Result<bool> {
		ensure_nonzero_id(tag.id, "Tag id")?;

		let descriptor = RequestDescriptor::new(Method::Delete, format!("/tags/{}", tag.id));

		Ok(self.executor().execute(&descriptor, cancel).await?.is_success())
	}
}
