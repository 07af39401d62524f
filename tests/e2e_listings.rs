//! E2E tests for listings and pagination

mod common;

use common::TestServer;
use serde_json::Value;

#[tokio::test]
async fn test_group_listing_contains_only_its_posts() {
    let server = TestServer::new().await;
    let poet = server.create_user("poet").await;
    let verse = server.create_group("verse", "Verse").await;
    server.create_group("prose", "Prose").await;

    server.create_post(&poet, Some(&verse), "a verse post").await;
    server.create_post(&poet, None, "an ungrouped post").await;

    let listing: Value = server
        .client
        .get(server.url("/groups/verse/posts"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(listing["group"]["slug"], "verse");
    assert_eq!(listing["group"]["title"], "Verse");
    let items = listing["page"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["text"], "a verse post");
    assert_eq!(items[0]["group"]["slug"], "verse");

    // The other group stays empty
    let other: Value = server
        .client
        .get(server.url("/groups/prose/posts"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(other["page"]["total_items"], 0);
}

#[tokio::test]
async fn test_group_listing_unknown_slug() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/groups/missing/posts"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_profile_lists_only_authors_posts() {
    let server = TestServer::new().await;
    let poet = server.create_user("poet").await;
    let other = server.create_user("other").await;

    server.create_post(&poet, None, "mine").await;
    server.create_post(&other, None, "not mine").await;

    let profile: Value = server
        .client
        .get(server.url("/profiles/poet"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(profile["author"]["username"], "poet");
    // Anonymous viewers never "follow"
    assert_eq!(profile["following"], false);
    let items = profile["page"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["text"], "mine");
}

#[tokio::test]
async fn test_profile_unknown_username() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/profiles/nobody"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_index_pagination_window() {
    let server = TestServer::new().await;
    let poet = server.create_user("poet").await;

    for i in 0..15 {
        server.create_post(&poet, None, &format!("post {}", i)).await;
    }

    let first: Value = server
        .client
        .get(server.url("/posts"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["items"].as_array().unwrap().len(), 10);
    assert_eq!(first["number"], 1);
    assert_eq!(first["total_pages"], 2);
    assert_eq!(first["total_items"], 15);
    assert_eq!(first["has_next"], true);
    assert_eq!(first["has_previous"], false);

    let second: Value = server
        .client
        .get(server.url("/posts?page=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["items"].as_array().unwrap().len(), 5);
    assert_eq!(second["has_next"], false);
    assert_eq!(second["has_previous"], true);
}

#[tokio::test]
async fn test_index_out_of_range_page_clamps() {
    let server = TestServer::new().await;
    let poet = server.create_user("poet").await;

    for i in 0..15 {
        server.create_post(&poet, None, &format!("post {}", i)).await;
    }

    // Far past the end: served the last page instead of an error
    let clamped: Value = server
        .client
        .get(server.url("/posts?page=99"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(clamped["number"], 2);
    assert_eq!(clamped["items"].as_array().unwrap().len(), 5);

    // Non-numeric: first page
    let soft: Value = server
        .client
        .get(server.url("/posts?page=abc"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(soft["number"], 1);
}

#[tokio::test]
async fn test_index_orders_newest_first() {
    let server = TestServer::new().await;
    let poet = server.create_user("poet").await;

    server.create_post(&poet, None, "older").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    server.create_post(&poet, None, "newer").await;

    let page: Value = server
        .client
        .get(server.url("/posts"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let texts: Vec<&str> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["newer", "older"]);
}

#[tokio::test]
async fn test_empty_index_is_a_single_empty_page() {
    let server = TestServer::new().await;

    let page: Value = server
        .client
        .get(server.url("/posts"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(page["items"].as_array().unwrap().len(), 0);
    assert_eq!(page["number"], 1);
    assert_eq!(page["total_pages"], 1);
    assert_eq!(page["has_next"], false);
    assert_eq!(page["has_previous"], false);
}
