//! Data model for entries, tags, paged listings, and token grants.
//!
//! The service encodes booleans as the integers `0`/`1` on the wire; the [`wire_bool`] codec
//! accepts both the numeric convention and native JSON booleans when reading, and always writes
//! the numeric form.

// self
use crate::_prelude::*;

/// Serde codec for the service's numeric-boolean wire convention.
pub(crate) mod wire_bool {
	// std
	use std::fmt::{Formatter, Result as FmtResult};
	// crates.io
	use serde::{
		Deserializer, Serializer,
		de::{Error as DeError, Visitor},
	};

	pub(crate) fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_u8(u8::from(*value))
	}

	pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct WireBoolVisitor;
		impl<'de> Visitor<'de> for WireBoolVisitor {
			type Value = bool;

			fn expecting(&self, f: &mut Formatter) -> FmtResult {
				f.write_str("0, 1, or a boolean")
			}

			fn visit_bool<E: DeError>(self, value: bool) -> Result<bool, E> {
				Ok(value)
			}

			fn visit_i64<E: DeError>(self, value: i64) -> Result<bool, E> {
				Ok(value != 0)
			}

			fn visit_u64<E: DeError>(self, value: u64) -> Result<bool, E> {
				Ok(value != 0)
			}
		}

		deserializer.deserialize_any(WireBoolVisitor)
	}
}

/// Token endpoint response body.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct TokenGrant {
	#[serde(default)]
	pub access_token: String,
	#[serde(default)]
	pub refresh_token: String,
}

/// A tag attached to one or more entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
	/// Server-assigned tag id.
	#[serde(default)]
	pub id: i64,
	/// Human-readable label.
	#[serde(default)]
	pub label: String,
	/// URL-safe slug derived from the label.
	#[serde(default)]
	pub slug: String,
}

/// A saved article with all data the server exposes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
	/// Server-assigned entry id.
	#[serde(default)]
	pub id: i64,
	/// Extracted title.
	#[serde(default)]
	pub title: Option<String>,
	/// Original article URL.
	#[serde(default)]
	pub url: Option<String>,
	/// Whether the entry has been archived (read). Numeric `0`/`1` on the wire.
	#[serde(default, with = "wire_bool")]
	pub is_archived: bool,
	/// Whether the entry has been starred. Numeric `0`/`1` on the wire.
	#[serde(default, with = "wire_bool")]
	pub is_starred: bool,
	/// Extracted article content (HTML).
	#[serde(default)]
	pub content: Option<String>,
	/// Instant the entry was saved.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Instant the entry was last modified.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
	/// Server-estimated reading time in minutes.
	#[serde(default)]
	pub reading_time: i64,
	/// Hostname the article was saved from.
	#[serde(default)]
	pub domain_name: Option<String>,
	/// Media type of the original document.
	#[serde(default)]
	pub mimetype: Option<String>,
	/// Language identifier reported by the server.
	#[serde(default, rename = "lang")]
	pub language: Option<String>,
	/// Tags currently attached to the entry.
	#[serde(default)]
	pub tags: Vec<Tag>,
	/// Preview image URL, when the server extracted one.
	#[serde(default)]
	pub preview_picture: Option<String>,
}

/// One page of an entries listing, with paging metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntriesPage {
	/// Current page number.
	#[serde(default)]
	pub page: i64,
	/// Total number of pages at the current limit.
	#[serde(default)]
	pub pages: i64,
	/// Items per page.
	#[serde(default)]
	pub limit: i64,
	/// Total number of matching entries.
	#[serde(default)]
	pub total: i64,
	#[serde(default, rename = "_embedded")]
	embedded: Embedded,
}
impl EntriesPage {
	/// Entries on this page.
	pub fn items(&self) -> &[Entry] {
		&self.embedded.items
	}

	/// Consumes the page, returning its entries.
	pub fn into_items(self) -> Vec<Entry> {
		self.embedded.items
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Embedded {
	#[serde(default)]
	items: Vec<Entry>,
}
