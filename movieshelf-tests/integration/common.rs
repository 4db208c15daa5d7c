//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::ops::RangeInclusive;

use mockito::{Matcher, Mock, ServerGuard};
use movieshelf_core::MovieshelfConfig;
use serde_json::{Value, json};

pub const CATALOG_PATH: &str = "/movies/paginated";

/// Movie record as the remote endpoint serves it.
pub fn movie_json(n: usize) -> Value {
    json!({
        "id": format!("remote-{n}"),
        "movie_id": 1000 + n,
        "original_title": format!("Remote Movie {n}"),
        "poster_path": format!("https://img.test/{n}.jpg"),
        "release_date": "2020-01-01",
        "vote_average": 6.5,
        "overview": format!("Overview {n}"),
        "casts": [{ "id": format!("c-{n}"), "name": format!("Actor {n}"), "character": null }],
        "genres": [{ "id": 18, "name": "Drama" }]
    })
}

/// Page body carrying records `ids`, laid out like the real endpoint.
pub fn page_body(current_page: u32, last_page: u32, ids: RangeInclusive<usize>) -> String {
    let data: Vec<Value> = ids.map(movie_json).collect();
    json!({
        "current_page": current_page,
        "data": data,
        "first_page_url": format!("{CATALOG_PATH}?page=1"),
        "from": 1,
        "last_page": last_page,
        "last_page_url": format!("{CATALOG_PATH}?page={last_page}"),
        "links": [],
        "next_page_url": null,
        "path": CATALOG_PATH,
        "per_page": 20,
        "prev_page_url": null,
        "to": 20,
        "total": 0
    })
    .to_string()
}

/// Serve `body` for `?page=<page>`, expecting exactly one request.
pub async fn mock_page(server: &mut ServerGuard, page: u32, body: String) -> Mock {
    server
        .mock("GET", CATALOG_PATH)
        .match_query(Matcher::UrlEncoded("page".into(), page.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(1)
        .create_async()
        .await
}

/// Answer `?page=<page>` with a bare status code.
pub async fn mock_status(server: &mut ServerGuard, page: u32, status: usize) -> Mock {
    server
        .mock("GET", CATALOG_PATH)
        .match_query(Matcher::UrlEncoded("page".into(), page.to_string()))
        .with_status(status)
        .expect(1)
        .create_async()
        .await
}

pub fn config_for(server: &ServerGuard) -> MovieshelfConfig {
    MovieshelfConfig::for_testing(format!("{}{CATALOG_PATH}", server.url()))
}
