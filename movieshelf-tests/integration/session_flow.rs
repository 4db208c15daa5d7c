//! Catalog session flow from the presentation layer's point of view

use std::time::Duration;

use mockito::Server;
use movieshelf_catalog::debounce::apply_queries;
use movieshelf_catalog::{
    CatalogHandle, CatalogLoader, CatalogSource, MovieCard, QueryDebouncer, SessionError,
    empty_state_message,
};
use movieshelf_core::tracing_setup::init_test_tracing;
use tokio::sync::mpsc;

use crate::common::{config_for, mock_page, mock_status, page_body};

#[tokio::test]
async fn test_browse_search_and_paginate() -> anyhow::Result<()> {
    init_test_tracing();
    let mut server = Server::new_async().await;
    let _page_1 = mock_page(&mut server, 1, page_body(1, 3, 1..=20)).await;
    let _page_2 = mock_page(&mut server, 2, page_body(2, 3, 21..=40)).await;
    let _page_3 = mock_page(&mut server, 3, page_body(3, 3, 41..=45)).await;

    let config = config_for(&server);
    let handle = CatalogHandle::from_config(&config)?;
    let loader = CatalogLoader::from_config(&config)?;

    assert!(!handle.is_loading());
    assert!(handle.movies().is_empty());

    assert_eq!(handle.initialize(&loader).await, Ok(CatalogSource::Remote));

    let view = handle.view();
    assert!(!view.loading);
    assert!(view.has_more);
    assert_eq!(view.movies.len(), 20);
    assert_eq!(view.movies[19].id, "remote-20");

    assert_eq!(handle.load_more_movies(), 20);
    assert_eq!(handle.load_more_movies(), 5);
    assert!(!handle.has_more());
    assert_eq!(handle.movies().len(), 45);

    // Titles 1, 10-19
    handle.search_movies("remote movie 1");
    assert_eq!(handle.movies().len(), 11);
    assert!(!handle.has_more());

    handle.search_movies("  ");
    assert_eq!(handle.movies().len(), 20);
    assert!(handle.has_more());

    handle.search_movies("no such title");
    assert!(handle.movies().is_empty());
    assert_eq!(
        empty_state_message(&handle.query()),
        "No movies found matching your search."
    );
    Ok(())
}

#[tokio::test]
async fn test_cards_render_remote_records() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _page_1 = mock_page(&mut server, 1, page_body(1, 1, 1..=2)).await;

    let config = config_for(&server);
    let handle = CatalogHandle::from_config(&config)?;
    handle
        .initialize(&CatalogLoader::from_config(&config)?)
        .await?;

    let cards: Vec<MovieCard> = handle.movies().iter().map(MovieCard::from).collect();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].title, "Remote Movie 1");
    assert_eq!(cards[0].year, "2020");
    assert_eq!(cards[0].rating, "6.5");
    assert_eq!(cards[0].cast, vec!["Actor 1".to_string()]);
    assert_eq!(cards[0].genres, "Drama");
    assert!(!handle.has_more());
    Ok(())
}

#[tokio::test]
async fn test_fallback_catalog_is_searchable() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _page_1 = mock_status(&mut server, 1, 502).await;

    let config = config_for(&server);
    let handle = CatalogHandle::from_config(&config)?;
    let source = handle
        .initialize(&CatalogLoader::from_config(&config)?)
        .await?;

    assert_eq!(source, CatalogSource::Fallback);
    assert!(!handle.movies().is_empty());
    assert!(!handle.has_more());

    handle.search_movies("MATRIX");
    let titles: Vec<String> = handle.movies().into_iter().map(|m| m.title).collect();
    assert_eq!(titles, vec!["The Matrix".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_query_set_before_load_applies_on_install() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _page_1 = mock_page(&mut server, 1, page_body(1, 1, 1..=12)).await;

    let config = config_for(&server);
    let handle = CatalogHandle::from_config(&config)?;
    handle.search_movies("Movie 1");
    assert!(handle.movies().is_empty());

    handle
        .initialize(&CatalogLoader::from_config(&config)?)
        .await?;

    // 1, 10, 11, 12
    assert_eq!(handle.movies().len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_second_initialize_is_rejected() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _page_1 = mock_page(&mut server, 1, page_body(1, 1, 1..=3)).await;

    let config = config_for(&server);
    let handle = CatalogHandle::from_config(&config)?;
    let loader = CatalogLoader::from_config(&config)?;
    handle.initialize(&loader).await?;

    assert_eq!(
        handle.initialize(&loader).await,
        Err(SessionError::AlreadyInitialized)
    );
    assert_eq!(handle.movies().len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_debounced_typing_settles_on_last_query() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _page_1 = mock_page(&mut server, 1, page_body(1, 1, 1..=15)).await;

    let config = config_for(&server);
    let handle = CatalogHandle::from_config(&config)?;
    handle
        .initialize(&CatalogLoader::from_config(&config)?)
        .await?;

    let (keystrokes, raw) = mpsc::channel(16);
    let (settled, debouncer) = QueryDebouncer::from_config(&config.search).spawn(raw);
    let applier = tokio::spawn(apply_queries(handle.clone(), settled));

    for typed in ["M", "Mo", "Movie", "Movie 1", "Movie 14"] {
        keystrokes.send(typed.to_string()).await?;
    }
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(handle.query(), "Movie 14");
    assert_eq!(handle.movies().len(), 1);

    drop(keystrokes);
    debouncer.await?;
    applier.await?;
    Ok(())
}
