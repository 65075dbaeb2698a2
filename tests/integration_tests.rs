//! Integration tests for halpub
//!
//! These tests exercise the full fetch/classify/render pipeline against a
//! mock HAL endpoint.

use std::collections::HashSet;
use std::time::Duration;

use halpub::classify::group_by_category;
use halpub::client::HalClient;
use halpub::models::Category;
use halpub::query::SearchQuery;
use halpub::render::render_text;
use halpub::Error;
use mockito::Matcher;

fn doc(hal_id: &str, doc_type: &str, year: i32, extra: serde_json::Value) -> serde_json::Value {
    let mut doc = serde_json::json!({
        "halId_s": hal_id,
        "docType_s": doc_type,
        "producedDateY_i": year,
    });
    doc.as_object_mut()
        .unwrap()
        .extend(extra.as_object().unwrap().clone());
    doc
}

fn body(docs: Vec<serde_json::Value>) -> String {
    serde_json::json!({
        "response": { "numFound": docs.len(), "docs": docs }
    })
    .to_string()
}

fn client_for(server: &mockito::ServerGuard) -> HalClient {
    let endpoint = format!("{}/search/", server.url());
    HalClient::with_endpoint(&endpoint, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_search_sorts_by_year_descending() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/search/")
        .match_query(Matcher::UrlEncoded("wt".into(), "json".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body(vec![
            doc("hal-1", "ART", 2016, serde_json::json!({})),
            doc("hal-2", "ART", 2022, serde_json::json!({})),
            serde_json::json!({"halId_s": "hal-3", "docType_s": "ART"}),
            doc("hal-4", "ART", 2019, serde_json::json!({})),
        ]))
        .create_async()
        .await;

    let client = client_for(&server);
    let records = client
        .search(&SearchQuery::new().author("jane-doe"))
        .await
        .unwrap();

    let ids: Vec<&str> = records.iter().map(|r| r.hal_id.as_str()).collect();
    // Yearless records sort last
    assert_eq!(ids, vec!["hal-2", "hal-4", "hal-1", "hal-3"]);
    for pair in records.windows(2) {
        assert!(pair[0].year_or_zero() >= pair[1].year_or_zero());
    }
}

#[tokio::test]
async fn test_search_surfaces_http_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/search/")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.search(&SearchQuery::new()).await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 503 }));
}

#[tokio::test]
async fn test_search_surfaces_parse_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/search/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.search(&SearchQuery::new()).await.unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

#[tokio::test]
async fn test_fetch_by_category_merges_structured_and_override() {
    let mut server = mockito::Server::new_async().await;

    // Structured ACL query carries the audience filter
    let structured = server
        .mock("GET", "/search/")
        // Matcher::UrlEncoded parses the query string into a map, so with
        // repeated `fq` keys only one value survives; match the encoded pairs
        // in the raw query string instead.
        .match_query(Matcher::AllOf(vec![
            Matcher::Regex("(^|&)fq=audience_s%3A2(&|$)".into()),
            Matcher::Regex("(^|&)fq=docType_s%3A%22ART%22(&|$)".into()),
        ]))
        .with_status(200)
        .with_body(body(vec![
            doc(
                "hal-struct-1",
                "ART",
                2021,
                serde_json::json!({"peerReviewing_s": 1, "audience_s": 2}),
            ),
            doc(
                "hal-struct-2",
                "ART",
                2018,
                serde_json::json!({"peerReviewing_s": 1, "audience_s": 2}),
            ),
        ]))
        .expect(1)
        .create_async()
        .await;

    // Override query asks for records whose comment names the category
    let overridden = server
        .mock("GET", "/search/")
        .match_query(Matcher::UrlEncoded("fq".into(), "comment_s:ACL".into()))
        .with_status(200)
        .with_body(body(vec![doc(
            "hal-override",
            "COUV",
            2020,
            serde_json::json!({"comment_s": "ACL"}),
        )]))
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let query = SearchQuery::new()
        .author("jane-doe")
        .category(Category::InternationalJournalArticle);
    let records = client.fetch_by_category(&query).await.unwrap();

    structured.assert_async().await;
    overridden.assert_async().await;

    // Structured results first, override results appended, no re-sort
    let ids: Vec<&str> = records.iter().map(|r| r.hal_id.as_str()).collect();
    assert_eq!(ids, vec!["hal-struct-1", "hal-struct-2", "hal-override"]);

    // Every record classifies to the requested category
    let grouped = group_by_category(records).unwrap();
    assert_eq!(grouped.get(Category::InternationalJournalArticle).len(), 3);
}

#[tokio::test]
async fn test_fetch_without_category_runs_single_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body(vec![doc(
            "hal-1",
            "THESE",
            2017,
            serde_json::json!({}),
        )]))
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let records = client
        .fetch_by_category(&SearchQuery::new().author("jane-doe"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_failed_subquery_fails_the_merge() {
    let mut server = mockito::Server::new_async().await;

    let _ok = server
        .mock("GET", "/search/")
        .match_query(Matcher::UrlEncoded("fq".into(), "comment_s:TH".into()))
        .with_status(200)
        .with_body(body(vec![]))
        .create_async()
        .await;
    let _fail = server
        .mock("GET", "/search/")
        // fq=docType_s:("THESE" OR "HDR"), matched against the raw encoded
        // query because Matcher::UrlEncoded cannot see repeated `fq` keys.
        .match_query(Matcher::Regex(
            "(^|&)fq=docType_s%3A%28%22THESE%22\\+OR\\+%22HDR%22%29(&|$)".into(),
        ))
        .with_status(500)
        .create_async()
        .await;

    let client = client_for(&server);
    let query = SearchQuery::new().category(Category::Thesis);
    let err = client.fetch_by_category(&query).await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 500 }));
}

#[tokio::test]
async fn test_invalid_input_rejected_before_any_network_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search/")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    // The only way to put a category into a query is through the registry,
    // which rejects unknown codes up front.
    let err = Category::from_code("XYZ").unwrap_err();
    assert!(matches!(err, Error::InvalidCategory(_)));

    // A malformed extra filter is also caught before the request is sent.
    let client = client_for(&server);
    let query = SearchQuery::new().filter("bad field", "x");
    let err = client.search(&query).await.unwrap_err();
    assert!(matches!(err, Error::InvalidFilter(_)));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_full_pipeline_fetch_classify_render() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/search/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body(vec![
            doc(
                "hal-talk",
                "COMM",
                2020,
                serde_json::json!({"invitedCommunication_s": 1, "title_s": "Invited Words"}),
            ),
            doc(
                "hal-thesis",
                "THESE",
                2016,
                serde_json::json!({"title_s": "A Thesis"}),
            ),
            doc(
                "hal-hidden",
                "THESE",
                2015,
                serde_json::json!({"title_s": "Hidden Thesis"}),
            ),
        ]))
        .create_async()
        .await;

    let client = client_for(&server);
    let records = client
        .fetch_by_category(&SearchQuery::new().author("jane-doe"))
        .await
        .unwrap();
    let grouped = group_by_category(records).unwrap();

    let excluded: HashSet<String> = ["hal-hidden".to_string()].into();
    let out = render_text(&grouped, &excluded, false);
    assert!(out.contains("Invited talks (INV)"));
    assert!(out.contains("Invited Words"));
    assert!(out.contains("A Thesis"));
    assert!(!out.contains("Hidden Thesis"));
}
