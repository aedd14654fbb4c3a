//! Integration tests for Industry Papers
//!
//! These tests run the real reqwest transport against a local mock of the
//! E-utilities endpoints.

use industry_papers::config::Config;
use industry_papers::output::csv::{read_papers, to_csv_string};
use industry_papers::sources::mock::{efetch_xml, esearch_xml, MockAuthor, MockTransport};
use industry_papers::sources::{PubMedSource, SourceError, Transport};
use industry_papers::utils::HttpClient;
use industry_papers::PaperFetcher;
use mockito::{Matcher, Server, ServerGuard};
use std::sync::Arc;

fn config_for(server: &ServerGuard) -> Config {
    let mut config = Config::default();
    config.eutils.search_url = format!("{}/esearch.fcgi", server.url());
    config.eutils.fetch_url = format!("{}/efetch.fcgi", server.url());
    config
}

fn single_author(pmid: &str, name: (&str, &str), affiliation: &str) -> String {
    efetch_xml(
        pmid,
        Some("Checkpoint inhibitors: a review"),
        Some("2024"),
        &[MockAuthor::new(name.0, name.1, Some(affiliation))],
    )
}

#[tokio::test]
async fn test_search_request_parameters() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("db".into(), "pubmed".into()),
            Matcher::UrlEncoded("term".into(), "cancer immunotherapy".into()),
            Matcher::UrlEncoded("retmode".into(), "xml".into()),
            Matcher::UrlEncoded("retmax".into(), "10".into()),
        ]))
        .with_status(200)
        .with_body(esearch_xml(&[]))
        .create_async()
        .await;

    let fetcher = PaperFetcher::from_config(&config_for(&server)).unwrap();
    let papers = fetcher.fetch_and_filter("cancer immunotherapy").await.unwrap();

    assert!(papers.is_empty());
    search.assert_async().await;
}

#[tokio::test]
async fn test_two_stage_fetch_keeps_industry_papers() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(esearch_xml(&["111", "222"]))
        .create_async()
        .await;
    let academic = server
        .mock("GET", "/efetch.fcgi")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("id".into(), "111".into()),
            Matcher::UrlEncoded("retmode".into(), "xml".into()),
        ]))
        .with_status(200)
        .with_body(single_author("111", ("Doe", "John"), "Stanford University"))
        .create_async()
        .await;
    let industry = server
        .mock("GET", "/efetch.fcgi")
        .match_query(Matcher::UrlEncoded("id".into(), "222".into()))
        .with_status(200)
        .with_body(single_author("222", ("Smith", "Jane"), "Genentech Inc."))
        .create_async()
        .await;

    let fetcher = PaperFetcher::from_config(&config_for(&server)).unwrap();
    let papers = fetcher.fetch_and_filter("cancer immunotherapy").await.unwrap();

    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].pubmed_id(), "222");
    assert_eq!(papers[0].non_academic_authors(), ["Jane Smith"]);
    assert_eq!(papers[0].company_affiliations(), ["Genentech Inc."]);
    academic.assert_async().await;
    industry.assert_async().await;
}

#[tokio::test]
async fn test_http_error_on_one_detail_is_absorbed() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(esearch_xml(&["1", "2", "3"]))
        .create_async()
        .await;
    for (id, company) in [("1", "Pfizer"), ("3", "Moderna")] {
        server
            .mock("GET", "/efetch.fcgi")
            .match_query(Matcher::UrlEncoded("id".into(), id.into()))
            .with_status(200)
            .with_body(single_author(id, ("Lee", "Ann"), company))
            .create_async()
            .await;
    }
    server
        .mock("GET", "/efetch.fcgi")
        .match_query(Matcher::UrlEncoded("id".into(), "2".into()))
        .with_status(500)
        .create_async()
        .await;

    let fetcher = PaperFetcher::from_config(&config_for(&server)).unwrap();
    let papers = fetcher.fetch_and_filter("q").await.unwrap();

    let ids: Vec<&str> = papers.iter().map(|p| p.pubmed_id()).collect();
    assert_eq!(ids, vec!["1", "3"]);
}

#[tokio::test]
async fn test_search_error_status_is_fatal() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::Any)
        .with_status(429)
        .create_async()
        .await;

    let fetcher = PaperFetcher::from_config(&config_for(&server)).unwrap();
    let err = fetcher.fetch_and_filter("q").await.unwrap_err();

    assert!(matches!(err, SourceError::SearchFailure { status: 429 }));
}

#[tokio::test]
async fn test_transport_reports_status_and_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/anything")
        .match_query(Matcher::UrlEncoded("id".into(), "a b".into()))
        .with_status(404)
        .with_body("not here")
        .create_async()
        .await;

    let client = HttpClient::new().unwrap();
    let response = client
        .get(&format!("{}/anything", server.url()), &[("id", "a b".to_string())])
        .await
        .unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(response.body, "not here");
    assert!(!response.is_success());
}

#[test]
fn test_fetcher_over_mock_transport() {
    let transport = MockTransport::new()
        .with_search("crispr", &["5", "6"])
        .with_detail("5", single_author("5", ("Roe", "Rick"), "Editas Medicine"))
        .with_detail("6", single_author("6", ("Poe", "Pat"), "Karolinska Institute"));
    let fetcher = PaperFetcher::new(PubMedSource::with_transport(Arc::new(transport)));

    let papers = tokio_test::block_on(fetcher.fetch_and_filter("crispr")).unwrap();

    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].pubmed_id(), "5");
    assert_eq!(papers[0].company_affiliations(), ["Editas Medicine"]);
}

#[tokio::test]
async fn test_csv_round_trip_of_fetched_papers() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(esearch_xml(&["42"]))
        .create_async()
        .await;
    server
        .mock("GET", "/efetch.fcgi")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(efetch_xml(
            "42",
            Some("Antibodies, engineered"),
            None,
            &[
                MockAuthor::new("Smith", "Jane", Some("Genentech Inc., South San Francisco"))
                    .email("smith.jane@gene.com"),
                MockAuthor::new("Moe", "Mia", Some("Beta Biotech")),
            ],
        ))
        .create_async()
        .await;

    let fetcher = PaperFetcher::from_config(&config_for(&server)).unwrap();
    let papers = fetcher.fetch_and_filter("antibodies").await.unwrap();
    let parsed = read_papers(to_csv_string(&papers).unwrap().as_bytes()).unwrap();

    assert_eq!(parsed, papers);
    assert_eq!(parsed[0].publication_date(), "Unknown Date");
    assert_eq!(parsed[0].corresponding_email(), "smith.jane@gene.com");
    assert_eq!(parsed[0].non_academic_authors(), ["Jane Smith", "Mia Moe"]);
}
