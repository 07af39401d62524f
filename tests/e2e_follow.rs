//! E2E tests for follow/unfollow and the follow feed

mod common;

use common::{TestServer, assert_login_redirect, assert_redirect};
use serde_json::Value;

#[tokio::test]
async fn test_follow_requires_auth() {
    let server = TestServer::new().await;
    server.create_user("poet").await;

    let response = server
        .client
        .post(server.url("/profiles/poet/follow"))
        .send()
        .await
        .unwrap();

    assert_login_redirect(&response);
    assert_eq!(server.state.db.count_follows().await.unwrap(), 0);
}

#[tokio::test]
async fn test_follow_creates_edge() {
    let server = TestServer::new().await;
    let author = server.create_user("poet").await;
    let reader = server.create_user("reader").await;

    let response = server
        .client
        .post(server.url("/profiles/poet/follow"))
        .header("Authorization", server.bearer(&reader))
        .send()
        .await
        .unwrap();

    assert_redirect(&response, "/feed");
    assert_eq!(server.state.db.count_follows().await.unwrap(), 1);
    assert!(
        server
            .state
            .db
            .is_following(&reader.id, &author.id)
            .await
            .unwrap()
    );

    // The profile payload reflects the edge for the follower
    let profile: Value = server
        .client
        .get(server.url("/profiles/poet"))
        .header("Authorization", server.bearer(&reader))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile["following"], true);
}

#[tokio::test]
async fn test_follow_twice_is_idempotent() {
    let server = TestServer::new().await;
    server.create_user("poet").await;
    let reader = server.create_user("reader").await;

    for _ in 0..2 {
        let response = server
            .client
            .post(server.url("/profiles/poet/follow"))
            .header("Authorization", server.bearer(&reader))
            .send()
            .await
            .unwrap();
        assert_redirect(&response, "/feed");
    }

    assert_eq!(server.state.db.count_follows().await.unwrap(), 1);
}

#[tokio::test]
async fn test_self_follow_is_a_noop() {
    let server = TestServer::new().await;
    let poet = server.create_user("poet").await;

    let response = server
        .client
        .post(server.url("/profiles/poet/follow"))
        .header("Authorization", server.bearer(&poet))
        .send()
        .await
        .unwrap();

    // Still redirects to the feed, but no edge appears
    assert_redirect(&response, "/feed");
    assert_eq!(server.state.db.count_follows().await.unwrap(), 0);
}

#[tokio::test]
async fn test_follow_unknown_author() {
    let server = TestServer::new().await;
    let reader = server.create_user("reader").await;

    let response = server
        .client
        .post(server.url("/profiles/nobody/follow"))
        .header("Authorization", server.bearer(&reader))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_unfollow_deletes_edge() {
    let server = TestServer::new().await;
    let author = server.create_user("poet").await;
    let reader = server.create_user("reader").await;

    server
        .client
        .post(server.url("/profiles/poet/follow"))
        .header("Authorization", server.bearer(&reader))
        .send()
        .await
        .unwrap();

    let response = server
        .client
        .post(server.url("/profiles/poet/unfollow"))
        .header("Authorization", server.bearer(&reader))
        .send()
        .await
        .unwrap();

    assert_redirect(&response, "/profiles/poet");
    assert_eq!(server.state.db.count_follows().await.unwrap(), 0);
    assert!(
        !server
            .state
            .db
            .is_following(&reader.id, &author.id)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_unfollow_missing_edge_is_not_found() {
    let server = TestServer::new().await;
    server.create_user("poet").await;
    let reader = server.create_user("reader").await;

    let response = server
        .client
        .post(server.url("/profiles/poet/unfollow"))
        .header("Authorization", server.bearer(&reader))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    assert_eq!(server.state.db.count_follows().await.unwrap(), 0);
}

#[tokio::test]
async fn test_feed_requires_auth() {
    let server = TestServer::new().await;

    let response = server.client.get(server.url("/feed")).send().await.unwrap();

    assert_login_redirect(&response);
}

#[tokio::test]
async fn test_feed_contains_only_followed_authors() {
    let server = TestServer::new().await;
    let followed = server.create_user("followed").await;
    let ignored = server.create_user("ignored").await;
    let reader = server.create_user("reader").await;

    server.create_post(&followed, None, "from followed").await;
    server.create_post(&ignored, None, "from ignored").await;

    server
        .client
        .post(server.url("/profiles/followed/follow"))
        .header("Authorization", server.bearer(&reader))
        .send()
        .await
        .unwrap();

    let feed: Value = server
        .client
        .get(server.url("/feed"))
        .header("Authorization", server.bearer(&reader))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let items = feed["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["text"], "from followed");
    assert_eq!(items[0]["author"]["username"], "followed");
}
