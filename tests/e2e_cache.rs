//! E2E tests for the index page cache

mod common;

use common::TestServer;

async fn index_body(server: &TestServer) -> String {
    server
        .client
        .get(server.url("/posts"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_index_is_cached_within_ttl() {
    let server = TestServer::new().await;
    let poet = server.create_user("poet").await;
    server.create_post(&poet, None, "before the cache fills").await;

    let first = index_body(&server).await;

    // A write after the page was rendered does not appear until the
    // entry expires; the bytes stay identical.
    server.create_post(&poet, None, "invisible for now").await;
    let second = index_body(&server).await;

    assert_eq!(first, second);
    assert!(!second.contains("invisible for now"));
}

#[tokio::test]
async fn test_index_refreshes_after_explicit_clear() {
    let server = TestServer::new().await;
    let poet = server.create_user("poet").await;
    server.create_post(&poet, None, "first post").await;

    let stale = index_body(&server).await;
    server.create_post(&poet, None, "second post").await;

    let response = server
        .client
        .post(server.url("/admin/cache/clear"))
        .header("Authorization", server.bearer(&poet))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let fresh = index_body(&server).await;
    assert_ne!(stale, fresh);
    assert!(fresh.contains("second post"));
}

#[tokio::test]
async fn test_cache_clear_requires_auth() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/admin/cache/clear"))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
}

#[tokio::test]
async fn test_index_refreshes_after_ttl() {
    let server = TestServer::with_cache_ttl(1).await;
    let poet = server.create_user("poet").await;
    server.create_post(&poet, None, "first post").await;

    let stale = index_body(&server).await;
    server.create_post(&poet, None, "second post").await;

    tokio::time::sleep(std::time::Duration::from_millis(1200)).await;

    let fresh = index_body(&server).await;
    assert_ne!(stale, fresh);
    assert!(fresh.contains("second post"));
}

#[tokio::test]
async fn test_cache_key_includes_query_string() {
    let server = TestServer::new().await;
    let poet = server.create_user("poet").await;

    for i in 0..15 {
        server.create_post(&poet, None, &format!("post {}", i)).await;
    }

    // Both windows are served and cached independently
    let page_one = server
        .client
        .get(server.url("/posts?page=1"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let page_two = server
        .client
        .get(server.url("/posts?page=2"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_ne!(page_one, page_two);
}
