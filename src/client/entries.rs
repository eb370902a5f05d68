//! Entry wrappers: save, list, fetch, archive/star toggles, delete.

// self
use crate::{
	_prelude::*,
	client::{Client, ensure_nonzero_id},
	http::Method,
	models::{EntriesPage, Entry},
	request::{Params, RequestDescriptor},
};

/// Optional metadata supplied when saving a new entry.
#[derive(Clone, Debug, Default)]
pub struct NewEntry {
	/// Tags to attach to the entry on creation.
	pub tags: Vec<String>,
	/// Explicit title, useful for documents without one (e.g. PDFs).
	pub title: Option<String>,
}
impl NewEntry {
	/// Attaches tags to the new entry.
	pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.tags = tags.into_iter().map(Into::into).collect();

		self
	}

	/// Sets an explicit title.
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());

		self
	}
}

/// Which timestamp a listing is sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateOrder {
	/// Sort by creation date.
	Created,
	/// Sort by last modification date.
	Updated,
}
impl DateOrder {
	const fn as_str(self) -> &'static str {
		match self {
			DateOrder::Created => "created",
			DateOrder::Updated => "updated",
		}
	}
}

/// Listing sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
	/// Oldest first.
	Ascending,
	/// Newest first.
	Descending,
}
impl SortDirection {
	const fn as_str(self) -> &'static str {
		match self {
			SortDirection::Ascending => "asc",
			SortDirection::Descending => "desc",
		}
	}
}

/// Filter options for entry listings, collapsed into one struct instead of parameter overloads.
#[derive(Clone, Debug, Default)]
pub struct EntryFilter {
	/// Only archived (`true`) or unarchived (`false`) entries.
	pub archived: Option<bool>,
	/// Only starred (`true`) or unstarred (`false`) entries.
	pub starred: Option<bool>,
	/// Timestamp the listing is sorted by.
	pub order_by: Option<DateOrder>,
	/// Sort direction.
	pub direction: Option<SortDirection>,
	/// Page number, starting at 1.
	pub page: Option<i64>,
	/// Items per page.
	pub per_page: Option<i64>,
	/// Only entries created at or after this instant.
	pub since: Option<OffsetDateTime>,
	/// Only entries carrying all of these tags.
	pub tags: Vec<String>,
}
impl EntryFilter {
	/// Restricts the listing to archived (or unarchived) entries.
	pub fn archived(mut self, archived: bool) -> Self {
		self.archived = Some(archived);

		self
	}

	/// Restricts the listing to starred (or unstarred) entries.
	pub fn starred(mut self, starred: bool) -> Self {
		self.starred = Some(starred);

		self
	}

	/// Sorts by the given timestamp.
	pub fn order_by(mut self, order: DateOrder) -> Self {
		self.order_by = Some(order);

		self
	}

	/// Sets the sort direction.
	pub fn direction(mut self, direction: SortDirection) -> Self {
		self.direction = Some(direction);

		self
	}

	/// Selects a page.
	pub fn page(mut self, page: i64) -> Self {
		self.page = Some(page);

		self
	}

	/// Sets the page size.
	pub fn per_page(mut self, per_page: i64) -> Self {
		self.per_page = Some(per_page);

		self
	}

	/// Only entries created at or after `since`.
	pub fn since(mut self, since: OffsetDateTime) -> Self {
		self.since = Some(since);

		self
	}

	/// Only entries carrying all of the given tags.
	pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.tags = tags.into_iter().map(Into::into).collect();

		self
	}

	// Parameter keys are appended in a fixed order so the query string stays stable.
	pub(crate) fn params(&self) -> Params {
		let mut params = Params::new();

		if let Some(archived) = self.archived {
			params.insert("archive", archived);
		}
		if let Some(starred) = self.starred {
			params.insert("starred", starred);
		}
		if let Some(order_by) = self.order_by {
			params.insert("sort", order_by.as_str());
		}
		if let Some(direction) = self.direction {
			params.insert("order", direction.as_str());
		}
		if let Some(page) = self.page {
			params.insert("page", page);
		}
		if let Some(per_page) = self.per_page {
			params.insert("perPage", per_page);
		}
		if let Some(since) = self.since {
			params.insert("since", since.unix_timestamp());
		}
		if !self.tags.is_empty() {
			params.insert("tags", self.tags.join(","));
		}

		params
	}
}

impl Client {
	/// Saves a new entry; `None` when the call fails.
	pub async fn add_entry(
		&self,
		url: &Url,
		entry: NewEntry,
		cancel: &CancellationToken,
	) -> Result<Option<Entry>> {
		let mut params = Params::new().with("url", url.as_str());

		if !entry.tags.is_empty() {
			params.insert("tags", entry.tags.join(","));
		}
		if let Some(title) = entry.title {
			params.insert("title", title);
		}

		let descriptor =
			RequestDescriptor::new(Method::Post, "/entries").with_parameters(params);

		self.executor().fetch(&descriptor, cancel).await
	}

	/// Returns one page of entries matching `filter`, with paging metadata; `None` when the call
	/// fails.
	pub async fn entries_page(
		&self,
		filter: &EntryFilter,
		cancel: &CancellationToken,
	) -> Result<Option<EntriesPage>> {
		let descriptor =
			RequestDescriptor::new(Method::Get, "/entries").with_parameters(filter.params());

		self.executor().fetch(&descriptor, cancel).await
	}

	/// Returns the entries matching `filter`, dropping paging metadata; empty when the call
	/// fails.
	pub async fn entries(
		&self,
		filter: &EntryFilter,
		cancel: &CancellationToken,
	) -> Result<Vec<Entry>> {
		Ok(self
			.entries_page(filter, cancel)
			.await?
			.map(EntriesPage::into_items)
			.unwrap_or_default())
	}

	/// Returns the entry with the given id; `None` when the call fails.
	pub async fn entry(&self, entry_id: i64, cancel: &CancellationToken) -> Result<Option<Entry>> {
		ensure_nonzero_id(entry_id, "Entry id")?;

		let descriptor = RequestDescriptor::new(Method::Get, format!("/entries/{entry_id}"));

		self.executor().fetch(&descriptor, cancel).await
	}

	/// Marks an entry as read. `true` only when the server reports the entry archived.
	pub async fn archive(&self, entry_id: i64, cancel: &CancellationToken) -> Result<bool> {
		self.set_archived(entry_id, true, cancel).await
	}

	/// Unmarks an entry as read. `true` only when the server reports the entry unarchived.
	pub async fn unarchive(&self, entry_id: i64, cancel: &CancellationToken) -> Result<bool> {
		self.set_archived(entry_id, false, cancel).await
	}

	/// Stars an entry. `true` only when the server reports the entry starred.
	pub async fn favorite(&self, entry_id: i64, cancel: &CancellationToken) -> Result<bool> {
		self.set_starred(entry_id, true, cancel).await
	}

	/// Unstars an entry. `true` only when the server reports the entry unstarred.
	pub async fn unfavorite(&self, entry_id: i64, cancel: &CancellationToken) -> Result<bool> {
		self.set_starred(entry_id, false, cancel).await
	}

	/// Deletes an entry permanently. `true` only for a 2xx response.
	pub async fn delete_entry(&self, entry_id: i64, cancel: &CancellationToken) -> Result<bool> {
		ensure_nonzero_id(entry_id, "Entry id")?;

		let descriptor = RequestDescriptor::new(Method::Delete, format!("/entries/{entry_id}"));

		Ok(self.executor().execute(&descriptor, cancel).await?.is_success())
	}

	async fn set_archived(
		&self,
		entry_id: i64,
		archived: bool,
		cancel: &CancellationToken,
	) -> Result<bool> {
		let entry = self.patch_entry(entry_id, "archive", archived, cancel).await?;

		Ok(entry.map(|e| e.is_archived) == Some(archived))
	}

	async fn set_starred(
		&self,
		entry_id: i64,
		starred: bool,
		cancel: &CancellationToken,
	) -> Result<bool> {
		let entry = self.patch_entry(entry_id, "starred", starred, cancel).await?;

		Ok(entry.map(|e| e.is_starred) == Some(starred))
	}

	async fn patch_entry(
		&self,
		entry_id: i64,
		key: &str,
		value: bool,
		cancel: &CancellationToken,
	) -> Result<Option<Entry>> {
		ensure_nonzero_id(entry_id, "Entry id")?;

		let descriptor = RequestDescriptor::new(Method::Patch, format!("/entries/{entry_id}"))
			.with_parameters(Params::new().with(key, value));

		self.executor().fetch(&descriptor, cancel).await
	}
}
