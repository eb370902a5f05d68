#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use readstash_api::{
	annotations::{Annotation, AnnotationRange},
	client::{Client, EntryFilter, NewEntry},
	config::ClientConfig,
	error::Error,
	models::Tag,
	time::OffsetDateTime,
	tokio_util::sync::CancellationToken,
	url::Url,
};

fn test_client(server: &MockServer) -> Client {
	let config = ClientConfig::builder(
		Url::parse(&server.base_url()).expect("Mock server URI should parse."),
		"client-id",
		"client-secret",
	)
	.build()
	.expect("Test configuration should build.");

	Client::new(config).expect("Reqwest-backed client should build.")
}

fn seed_fresh_tokens(client: &Client) {
	client.tokens().restore("access-fresh", "refresh-fresh", Some(OffsetDateTime::now_utc()));
}

#[tokio::test]
async fn version_is_fetched_without_auth_and_cached() {
	let server = MockServer::start_async().await;
	// No tokens are seeded; the version endpoint must not require them.
	let client = test_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/version.json");
			then.status(200).header("content-type", "application/json").body("\"2.6.8\"");
		})
		.await;
	let cancel = CancellationToken::new();
	let first = client.version(false, &cancel).await.expect("Version fetch should not raise.");
	let second = client.version(false, &cancel).await.expect("Cached version should not raise.");

	assert_eq!(first, "2.6.8");
	assert_eq!(second, "2.6.8");

	mock.assert_calls_async(1).await;

	let forced = client.version(true, &cancel).await.expect("Forced refetch should not raise.");

	assert_eq!(forced, "2.6.8");

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn add_entry_submits_url_tags_and_title() {
	let server = MockServer::start_async().await;
	let client = test_client(&server);

	seed_fresh_tokens(&client);

	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/entries.json")
				.body_includes("\"url\":\"https://example.com/article\"")
				.body_includes("\"tags\":\"rust,async\"")
				.body_includes("\"title\":\"Custom title\"");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":7,\"title\":\"Custom title\",\"url\":\"https://example.com/article\"}");
		})
		.await;
	let url = Url::parse("https://example.com/article").expect("Article URL should parse.");
	let entry = client
		.add_entry(
			&url,
			NewEntry::default().with_tags(["rust", "async"]).with_title("Custom title"),
			&CancellationToken::new(),
		)
		.await
		.expect("Saving an entry should not raise.");

	mock.assert_async().await;

	assert_eq!(entry.map(|e| e.id), Some(7));
}

#[tokio::test]
async fn listings_unwrap_the_paging_envelope() {
	let server = MockServer::start_async().await;
	let client = test_client(&server);

	seed_fresh_tokens(&client);

	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/entries.json").query_param("archive", "1");
			then.status(200).header("content-type", "application/json").body(
				"{\"page\":1,\"pages\":1,\"limit\":30,\"total\":1,\
				 \"_embedded\":{\"items\":[{\"id\":7,\"title\":\"Sample\",\"is_archived\":1}]}}",
			);
		})
		.await;
	let entries = client
		.entries(&EntryFilter::default().archived(true), &CancellationToken::new())
		.await
		.expect("Listing should not raise.");

	mock.assert_async().await;

	assert_eq!(entries.len(), 1);
	assert_eq!(entries[0].id, 7);
	assert!(entries[0].is_archived);
}

#[tokio::test]
async fn fetching_a_missing_entry_degrades_to_none() {
	let server = MockServer::start_async().await;
	let client = test_client(&server);

	seed_fresh_tokens(&client);

	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/entries/1337.json");
			then.status(404).header("content-type", "application/json").body("{}");
		})
		.await;
	let entry =
		client.entry(1337, &CancellationToken::new()).await.expect("404 should not raise.");

	mock.assert_async().await;

	assert_eq!(entry, None);
}

#[tokio::test]
async fn zero_ids_are_rejected_before_any_network_call() {
	let server = MockServer::start_async().await;
	let client = test_client(&server);

	seed_fresh_tokens(&client);

	let cancel = CancellationToken::new();

	assert!(matches!(
		client.entry(0, &cancel).await,
		Err(Error::InvalidArgument { .. }),
	));
	assert!(matches!(
		client.delete_entry(0, &cancel).await,
		Err(Error::InvalidArgument { .. }),
	));
	assert!(matches!(
		client.annotations(0, &cancel).await,
		Err(Error::InvalidArgument { .. }),
	));
}

#[tokio::test]
async fn archive_reports_what_the_server_confirms() {
	let server = MockServer::start_async().await;
	let client = test_client(&server);

	seed_fresh_tokens(&client);

	let confirmed = server
		.mock_async(|when, then| {
			when.method(PATCH).path("/api/entries/7.json").body_includes("\"archive\":1");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":7,\"is_archived\":1}");
		})
		.await;
	// Entry 8 answers 200 but reports the entry still unarchived.
	let unconfirmed = server
		.mock_async(|when, then| {
			when.method(PATCH).path("/api/entries/8.json");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":8,\"is_archived\":0}");
		})
		.await;
	let cancel = CancellationToken::new();

	assert!(client.archive(7, &cancel).await.expect("Archive should not raise."));
	assert!(!client.archive(8, &cancel).await.expect("Archive should not raise."));

	confirmed.assert_async().await;
	unconfirmed.assert_async().await;
}

#[tokio::test]
async fn delete_reflects_the_http_outcome() {
	let server = MockServer::start_async().await;
	let client = test_client(&server);

	seed_fresh_tokens(&client);

	server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/entries/7.json");
			then.status(200).header("content-type", "application/json").body("{\"id\":7}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/entries/8.json");
			then.status(404).body("{}");
		})
		.await;

	let cancel = CancellationToken::new();

	assert!(client.delete_entry(7, &cancel).await.expect("Delete should not raise."));
	assert!(!client.delete_entry(8, &cancel).await.expect("Delete should not raise."));
}

#[tokio::test]
async fn attaching_tags_returns_the_server_assigned_tags() {
	let server = MockServer::start_async().await;
	let client = test_client(&server);

	seed_fresh_tokens(&client);

	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/entries/7/tags.json")
				.body_includes("\"tags\":\"rust,async\"");
			then.status(200).header("content-type", "application/json").body(
				"{\"id\":7,\"tags\":[\
				 {\"id\":1,\"label\":\"rust\",\"slug\":\"rust\"},\
				 {\"id\":2,\"label\":\"async\",\"slug\":\"async\"}]}",
			);
		})
		.await;
	let tags = client
		.add_tags(7, &["rust", "async"], &CancellationToken::new())
		.await
		.expect("Attaching tags should not raise.")
		.expect("Both labels should come back with server-assigned ids.");

	mock.assert_async().await;

	assert_eq!(tags.len(), 2);
	assert_eq!(tags[0].id, 1);
}

#[tokio::test]
async fn partial_tag_attachments_are_not_reported_as_success() {
	let server = MockServer::start_async().await;
	let client = test_client(&server);

	seed_fresh_tokens(&client);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/entries/7/tags.json");
			then.status(200).header("content-type", "application/json").body(
				"{\"id\":7,\"tags\":[{\"id\":1,\"label\":\"rust\",\"slug\":\"rust\"}]}",
			);
		})
		.await;

	let tags = client
		.add_tags(7, &["rust", "async"], &CancellationToken::new())
		.await
		.expect("Attaching tags should not raise.");

	assert_eq!(tags, None);
}

#[tokio::test]
async fn removing_tags_checks_the_final_entry_state() {
	let server = MockServer::start_async().await;
	let client = test_client(&server);

	seed_fresh_tokens(&client);

	let mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/entries/7/tags/1.json");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":7,\"tags\":[]}");
		})
		.await;
	let tag = Tag { id: 1, label: "rust".into(), slug: "rust".into() };
	let removed = client
		.remove_tags(7, &[tag], &CancellationToken::new())
		.await
		.expect("Detaching tags should not raise.");

	mock.assert_async().await;

	assert!(removed);
}

#[tokio::test]
async fn removing_a_tag_everywhere_reflects_the_http_outcome() {
	let server = MockServer::start_async().await;
	let client = test_client(&server);

	seed_fresh_tokens(&client);

	let removed = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/tags/1.json");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":1,\"label\":\"rust\",\"slug\":\"rust\"}");
		})
		.await;
	let rejected = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/tags/2.json");
			then.status(500);
		})
		.await;
	let cancel = CancellationToken::new();
	let rust = Tag { id: 1, label: "rust".into(), slug: "rust".into() };
	let stale = Tag { id: 2, label: "stale".into(), slug: "stale".into() };

	assert!(client
		.remove_tag_everywhere(&rust, &cancel)
		.await
		.expect("Tag removal should not raise."));
	assert!(!client
		.remove_tag_everywhere(&stale, &cancel)
		.await
		.expect("Failed tag removal should not raise."));

	removed.assert_async().await;
	rejected.assert_async().await;
}

#[tokio::test]
async fn invalid_annotations_never_reach_the_transport() {
	let server = MockServer::start_async().await;
	let client = test_client(&server);

	seed_fresh_tokens(&client);

	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/annotations/7.json");
			then.status(200);
		})
		.await;
	let malformed =
		Annotation::new(vec![AnnotationRange::new("p[0]", 0, "/p[1]", 5)], "Broken range");
	let err = client
		.add_annotation(7, &malformed, &CancellationToken::new())
		.await
		.expect_err("Malformed ranges should be rejected locally.");

	assert!(matches!(err, Error::Validation(_)));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn annotations_are_created_and_listed() {
	let server = MockServer::start_async().await;
	let client = test_client(&server);

	seed_fresh_tokens(&client);

	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/annotations/7.json")
				.body_includes("\"text\":\"Worth remembering\"")
				.body_includes("\"start\":\"/p[0]\"");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":3,\"text\":\"Worth remembering\",\"ranges\":[{\"start\":\"/p[0]\",\"startOffset\":0,\"end\":\"/p[1]\",\"endOffset\":5}]}");
		})
		.await;
	let list = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/annotations/7.json");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"total\":1,\"rows\":[{\"id\":3,\"text\":\"Worth remembering\"}]}");
		})
		.await;
	let cancel = CancellationToken::new();
	let annotation =
		Annotation::new(vec![AnnotationRange::new("/p[0]", 0, "/p[1]", 5)], "Worth remembering")
			.with_quote("highlighted passage");
	let created = client
		.add_annotation(7, &annotation, &cancel)
		.await
		.expect("Creating an annotation should not raise.");

	create.assert_async().await;

	assert_eq!(created.map(|a| a.id), Some(3));

	let listed =
		client.annotations(7, &cancel).await.expect("Listing annotations should not raise.");

	list.assert_async().await;

	assert_eq!(listed.len(), 1);
	assert_eq!(listed[0].id, 3);
}

#[tokio::test]
async fn annotations_are_updated_in_place() {
	let server = MockServer::start_async().await;
	let client = test_client(&server);

	seed_fresh_tokens(&client);

	let mock = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path("/api/annotations/3.json")
				.body_includes("\"text\":\"Revised note\"");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":3,\"text\":\"Revised note\"}");
		})
		.await;
	let revision =
		Annotation::new(vec![AnnotationRange::new("/p[0]", 0, "/p[1]", 5)], "Revised note");
	let updated = client
		.update_annotation(3, &revision, &CancellationToken::new())
		.await
		.expect("Updating an annotation should not raise.");

	mock.assert_async().await;

	assert_eq!(updated.map(|a| (a.id, a.text)), Some((3, "Revised note".into())));
}

#[tokio::test]
async fn invalid_annotation_updates_never_reach_the_transport() {
	let server = MockServer::start_async().await;
	let client = test_client(&server);

	seed_fresh_tokens(&client);

	let mock = server
		.mock_async(|when, then| {
			when.method(PUT).path("/api/annotations/3.json");
			then.status(200);
		})
		.await;
	let malformed = Annotation::new(Vec::new(), "No ranges at all");
	let err = client
		.update_annotation(3, &malformed, &CancellationToken::new())
		.await
		.expect_err("Rangeless annotations should be rejected locally.");

	assert!(matches!(err, Error::Validation(_)));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn deleting_annotations_reflects_the_http_outcome() {
	let server = MockServer::start_async().await;
	let client = test_client(&server);

	seed_fresh_tokens(&client);

	server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/annotations/3.json");
			then.status(200).header("content-type", "application/json").body("{\"id\":3}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/annotations/4.json");
			then.status(404).body("{}");
		})
		.await;

	let cancel = CancellationToken::new();

	assert!(client
		.delete_annotation(3, &cancel)
		.await
		.expect("Annotation deletion should not raise."));
	assert!(!client
		.delete_annotation(4, &cancel)
		.await
		.expect("Failed annotation deletion should not raise."));
}
