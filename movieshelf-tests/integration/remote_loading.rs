//! Remote catalog loading against a mocked paging endpoint
//!
//! Covers the fetch sequence end to end: page ceiling, last-page detection,
//! empty pages, and when the bundled fallback dataset takes over.

use mockito::{Matcher, Server};
use movieshelf_catalog::{CatalogLoader, CatalogSource, FallbackDataset, LoadTermination};
use movieshelf_core::MovieshelfConfig;
use movieshelf_core::tracing_setup::init_test_tracing;
use tokio_util::sync::CancellationToken;

use crate::common::{CATALOG_PATH, config_for, mock_page, mock_status, page_body};

#[tokio::test]
async fn test_three_pages_load_completely() -> anyhow::Result<()> {
    init_test_tracing();
    let mut server = Server::new_async().await;
    let page_1 = mock_page(&mut server, 1, page_body(1, 3, 1..=20)).await;
    let page_2 = mock_page(&mut server, 2, page_body(2, 3, 21..=40)).await;
    let page_3 = mock_page(&mut server, 3, page_body(3, 3, 41..=45)).await;

    let loader = CatalogLoader::from_config(&config_for(&server))?;
    let load = loader.load_with_report(&CancellationToken::new()).await;

    page_1.assert_async().await;
    page_2.assert_async().await;
    page_3.assert_async().await;
    assert_eq!(load.movies.len(), 45);
    assert_eq!(load.pages_fetched, 3);
    assert_eq!(load.source, CatalogSource::Remote);
    assert!(matches!(load.termination, LoadTermination::LastPage));
    assert_eq!(load.movies[0].id, "remote-1");
    assert_eq!(load.movies[44].title, "Remote Movie 45");
    Ok(())
}

#[tokio::test]
async fn test_first_page_failure_uses_bundled_fallback() -> anyhow::Result<()> {
    init_test_tracing();
    let mut server = Server::new_async().await;
    let page_1 = mock_status(&mut server, 1, 500).await;

    let loader = CatalogLoader::from_config(&config_for(&server))?;
    let load = loader.load_with_report(&CancellationToken::new()).await;

    page_1.assert_async().await;
    assert_eq!(load.movies.len(), FallbackDataset::bundled().len());
    assert!(load.used_fallback());
    assert!(matches!(
        load.termination,
        LoadTermination::PageFailed { page: 1, .. }
    ));
    Ok(())
}

#[tokio::test]
async fn test_later_page_failure_keeps_partial_catalog() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _page_1 = mock_page(&mut server, 1, page_body(1, 4, 1..=20)).await;
    let page_2 = mock_status(&mut server, 2, 503).await;
    let page_3 = server
        .mock("GET", CATALOG_PATH)
        .match_query(Matcher::UrlEncoded("page".into(), "3".into()))
        .expect(0)
        .create_async()
        .await;

    let loader = CatalogLoader::from_config(&config_for(&server))?;
    let load = loader.load_with_report(&CancellationToken::new()).await;

    page_2.assert_async().await;
    page_3.assert_async().await;
    assert_eq!(load.movies.len(), 20);
    assert_eq!(load.source, CatalogSource::Partial);
    assert!(load.movies.iter().all(|m| m.id.starts_with("remote-")));
    Ok(())
}

#[tokio::test]
async fn test_page_ceiling_stops_at_five_pages() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let mut pages = Vec::new();
    for page in 1..=5u32 {
        let first = (page as usize - 1) * 20 + 1;
        pages.push(mock_page(&mut server, page, page_body(page, 9, first..=first + 19)).await);
    }
    let page_6 = server
        .mock("GET", CATALOG_PATH)
        .match_query(Matcher::UrlEncoded("page".into(), "6".into()))
        .expect(0)
        .create_async()
        .await;

    let loader = CatalogLoader::from_config(&config_for(&server))?;
    let movies = loader.load_full_catalog().await;

    for page in &pages {
        page.assert_async().await;
    }
    page_6.assert_async().await;
    assert_eq!(movies.len(), 100);
    Ok(())
}

#[tokio::test]
async fn test_malformed_data_ends_without_fallback() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _page_1 = mock_page(
        &mut server,
        1,
        serde_json::json!({ "current_page": 1, "data": "unavailable", "last_page": 3 }).to_string(),
    )
    .await;

    let loader = CatalogLoader::from_config(&config_for(&server))?;
    let load = loader.load_with_report(&CancellationToken::new()).await;

    assert!(load.movies.is_empty());
    assert!(matches!(load.termination, LoadTermination::EmptyPage));
    assert_eq!(load.source, CatalogSource::Remote);
    Ok(())
}

#[tokio::test]
async fn test_undecodable_body_counts_as_failure() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _page_1 = mock_page(&mut server, 1, "<html>502 Bad Gateway</html>".to_string()).await;

    let loader = CatalogLoader::from_config(&config_for(&server))?;
    let load = loader.load_with_report(&CancellationToken::new()).await;

    assert!(load.used_fallback());
    assert!(!load.movies.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unreachable_endpoint_uses_fallback() -> anyhow::Result<()> {
    let config = MovieshelfConfig::for_testing("http://127.0.0.1:1/movies/paginated");

    let loader = CatalogLoader::from_config(&config)?;
    let movies = loader.load_full_catalog().await;

    assert_eq!(movies.len(), FallbackDataset::bundled().len());
    Ok(())
}

#[tokio::test]
async fn test_invalid_base_url_is_rejected() {
    let config = MovieshelfConfig::for_testing("no scheme here");
    assert!(CatalogLoader::from_config(&config).is_err());
}
