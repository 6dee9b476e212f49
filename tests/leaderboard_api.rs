// tests/leaderboard_api.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use leaderboard::{
    config::Config,
    error::AppError,
    models::{participant::Session, quiz_result::QuizResultDocument},
    routes,
    services::result_store::{MemoryResultStore, ResultStore},
    state::AppState,
    utils::jwt::sign_jwt,
    view::LOAD_FAILED_MESSAGE,
};
use url::Url;

const SECRET: &str = "test_secret_for_integration_tests";

fn test_config() -> Config {
    Config {
        database_url: None,
        seed_file: None,
        jwt_secret: SECRET.to_string(),
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        board_title: "Integration Board".to_string(),
        fetch_limit: 100,
        page_size: 20,
        load_more_delay_ms: 0,
        avatar_base_url: Url::parse("https://ui-avatars.com/api/").unwrap(),
        home_url: "/index.html".to_string(),
        public_origin: "http://localhost:3000".to_string(),
    }
}

/// Builds `n` results; result `i` belongs to `user-i`, scores `i % 11` out of 10
/// and was completed `i` hours ago.
fn results(n: usize) -> Vec<QuizResultDocument> {
    let now = Utc::now();
    (0..n)
        .map(|i| QuizResultDocument {
            id: uuid::Uuid::new_v4().to_string(),
            score: Some((i % 11) as i64),
            total: Some(10),
            time_taken: Some(40 + (i as i64 * 7) % 90),
            completed_at: Some(now - TimeDelta::hours(i as i64)),
            user_id: Some(format!("user-{}", i)),
            user_first_name: Some(format!("Player {}", i)),
            user_name: None,
            quiz_title: Some("General Knowledge".to_string()),
        })
        .collect()
}

/// Store whose every query fails, like an unreachable database.
struct UnreachableStore;

#[async_trait]
impl ResultStore for UnreachableStore {
    async fn recent_results(&self, _: usize) -> Result<Vec<QuizResultDocument>, AppError> {
        Err(AppError::InternalServerError("connection refused".to_string()))
    }
}

/// Spawns the app on a random port with an in-memory store.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app(store: Arc<dyn ResultStore>) -> String {
    let state = AppState {
        store,
        config: test_config(),
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

fn token_for(uid: &str) -> String {
    sign_jwt(&Session::new(uid), SECRET, 600).unwrap()
}

#[tokio::test]
async fn anonymous_visitor_is_rejected() {
    // Arrange
    let address = spawn_app(Arc::new(MemoryResultStore::new(results(5)))).await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/api/leaderboard", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn invalid_token_is_treated_as_anonymous() {
    let address = spawn_app(Arc::new(MemoryResultStore::new(results(5)))).await;
    let client = reqwest::Client::new();

    let token = sign_jwt(&Session::new("user-1"), "some_other_secret", 600).unwrap();
    let response = client
        .get(format!("{}/api/leaderboard", address))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn signed_in_user_gets_full_page() {
    // Arrange
    let address = spawn_app(Arc::new(MemoryResultStore::new(results(30)))).await;
    let client = reqwest::Client::new();

    // Act
    let body = client
        .get(format!("{}/api/leaderboard", address))
        .bearer_auth(token_for("user-4"))
        .send()
        .await
        .expect("Failed to execute request")
        .json::<serde_json::Value>()
        .await
        .unwrap();

    // Assert
    assert_eq!(body["quiz_info"]["title"], "Integration Board");
    assert_eq!(body["quiz_info"]["total_participants"], 30);
    assert_eq!(body["podium"].as_array().unwrap().len(), 3);
    assert_eq!(body["podium"][0]["score"], 100);
    assert_eq!(body["items"].as_array().unwrap().len(), 20);
    assert_eq!(body["remaining"], 10);
    assert_eq!(body["has_more"], true);
    assert_eq!(body["statistics"]["total_attempts"], 30);
    assert_eq!(body["statistics"]["highest_score"], 100);
    assert_eq!(body["user_position"]["name"], "Player 4");
    assert_eq!(body["loading"], false);
    assert!(body["notifications"].as_array().unwrap().is_empty());

    let ranks: Vec<u64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["rank"].as_u64().unwrap())
        .collect();
    assert_eq!(ranks, (1..=20).collect::<Vec<u64>>());
}

#[tokio::test]
async fn pages_accumulate() {
    let address = spawn_app(Arc::new(MemoryResultStore::new(results(45)))).await;
    let client = reqwest::Client::new();

    let body = client
        .get(format!("{}/api/leaderboard?page=2", address))
        .bearer_auth(token_for("user-1"))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();

    assert_eq!(body["items"].as_array().unwrap().len(), 40);
    assert_eq!(body["remaining"], 5);

    let body = client
        .get(format!("{}/api/leaderboard?page=9", address))
        .bearer_auth(token_for("user-1"))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();

    assert_eq!(body["items"].as_array().unwrap().len(), 45);
    assert_eq!(body["has_more"], false);
}

#[tokio::test]
async fn filter_and_sort_shape_the_list_only() {
    let address = spawn_app(Arc::new(MemoryResultStore::new(results(60)))).await;
    let client = reqwest::Client::new();

    let body = client
        .get(format!("{}/api/leaderboard?filter=today&sort=time", address))
        .bearer_auth(token_for("user-50"))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();

    // Results 0..=23 are younger than 24 hours.
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len() + body["remaining"].as_u64().unwrap() as usize, 24);

    let times: Vec<u64> = items
        .iter()
        .map(|item| item["elapsed_seconds"].as_u64().unwrap())
        .collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));

    // Podium, position and statistics still describe everyone.
    assert_eq!(body["statistics"]["total_attempts"], 60);
    assert_eq!(body["user_position"]["name"], "Player 50");
}

#[tokio::test]
async fn empty_store_returns_info_notification() {
    let address = spawn_app(Arc::new(MemoryResultStore::default())).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/leaderboard", address))
        .bearer_auth(token_for("user-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["notifications"][0]["severity"], "info");
    assert!(body["quiz_info"].is_null());
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn store_failure_returns_page_with_error() {
    // Arrange
    let address = spawn_app(Arc::new(UnreachableStore)).await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/api/leaderboard", address))
        .bearer_auth(token_for("user-1"))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 503);

    let body = response.json::<serde_json::Value>().await.unwrap();
    let notifications = body["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["severity"], "error");
    assert_eq!(notifications[0]["message"], LOAD_FAILED_MESSAGE);
    assert!(body["quiz_info"].is_null());
    assert_eq!(body["loading"], false);
}

#[tokio::test]
async fn invalid_query_is_rejected() {
    let address = spawn_app(Arc::new(MemoryResultStore::new(results(5)))).await;
    let client = reqwest::Client::new();

    for query in ["page=0", "page=51", "filter=year", "sort=name"] {
        let response = client
            .get(format!("{}/api/leaderboard?{}", address, query))
            .bearer_auth(token_for("user-1"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400, "{}", query);
    }
}

#[tokio::test]
async fn share_message_uses_public_origin() {
    let address = spawn_app(Arc::new(MemoryResultStore::default())).await;
    let client = reqwest::Client::new();

    let body = client
        .get(format!("{}/api/leaderboard/share", address))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();

    assert_eq!(body["url"], "http://localhost:3000");
    assert!(body["text"].as_str().unwrap().ends_with("http://localhost:3000"));
}
