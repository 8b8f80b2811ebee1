//! API integration tests
//!
//! These tests run against a live server with a seeded database.
//! Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Register a throwaway user and return its token and id
async fn register_user(client: &Client, email: &str) -> (String, i64) {
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": "testpass"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    let body: Value = response.json().await.expect("Failed to parse register response");
    let token = body["token"].as_str().expect("No token in response").to_string();
    let user_id = body["user_id"].as_i64().expect("No user_id in response");
    (token, user_id)
}

/// Log in as the seeded admin and return a token
async fn get_admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/admin/login", BASE_URL))
        .json(&json!({
            "email": "admin@libris.test",
            "password": "adminpass"
        }))
        .send()
        .await
        .expect("Failed to send admin login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_probes_database() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "nobody@libris.test",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_list_books_is_public() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_issue_requires_auth() {
    let client = Client::new();

    let response = client
        .post(format!("{}/issues", BASE_URL))
        .json(&json!({ "book_id": 1 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_issue_and_return_lifecycle() {
    let client = Client::new();
    let (token, _) = register_user(&client, "lifecycle@libris.test").await;

    // Issue a seeded book
    let response = client
        .post(format!("{}/issues", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": 1 }))
        .send()
        .await
        .expect("Failed to send issue request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let issue_id = body["issue_id"].as_i64().expect("No issue_id");
    assert!(body["due_date"].is_string());

    // Return it; on-time returns carry no fine
    let response = client
        .put(format!("{}/issues/{}/return", BASE_URL, issue_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send return request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["days_overdue"], 0);

    // A second return must fail: the transition is terminal
    let response = client
        .put(format!("{}/issues/{}/return", BASE_URL, issue_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send second return request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_return_someone_elses_loan_is_not_found() {
    let client = Client::new();
    let (owner_token, _) = register_user(&client, "owner@libris.test").await;
    let (other_token, _) = register_user(&client, "other@libris.test").await;

    let response = client
        .post(format!("{}/issues", BASE_URL))
        .header("Authorization", format!("Bearer {}", owner_token))
        .json(&json!({ "book_id": 2 }))
        .send()
        .await
        .expect("Failed to send issue request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let issue_id = body["issue_id"].as_i64().expect("No issue_id");

    // Other users cannot tell this loan apart from a missing one
    let response = client
        .put(format!("{}/issues/{}/return", BASE_URL, issue_id))
        .header("Authorization", format!("Bearer {}", other_token))
        .send()
        .await
        .expect("Failed to send return request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_issue_with_invalid_period_is_rejected() {
    let client = Client::new();
    let (token, _) = register_user(&client, "period@libris.test").await;

    let response = client
        .post(format!("{}/issues", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": 1, "due_days": 0 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_user_loans_are_private() {
    let client = Client::new();
    let (_, owner_id) = register_user(&client, "private@libris.test").await;
    let (other_token, _) = register_user(&client, "snooper@libris.test").await;

    let response = client
        .get(format!("{}/issues/user/{}", BASE_URL, owner_id))
        .header("Authorization", format!("Bearer {}", other_token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_feedback_conflicts() {
    let client = Client::new();
    let (token, _) = register_user(&client, "reviewer@libris.test").await;

    let payload = json!({ "book_id": 1, "rating": 4, "comment": "Good read" });

    let response = client
        .post(format!("{}/feedback", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send feedback request");

    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/feedback", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send duplicate feedback request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_admin_routes_reject_users() {
    let client = Client::new();
    let (token, _) = register_user(&client, "plain@libris.test").await;

    let response = client
        .get(format!("{}/admin/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_admin_stats() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .get(format!("{}/admin/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total_books"].is_number());
    assert!(body["active_issues"].is_number());
    assert!(body["total_fines_collected"].is_string() || body["total_fines_collected"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_delete_user_with_loan_history_conflicts() {
    let client = Client::new();
    let admin_token = get_admin_token(&client).await;
    let (token, user_id) = register_user(&client, "history@libris.test").await;

    // Issue and return a book so the user has only returned-loan history
    let response = client
        .post(format!("{}/issues", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": 1 }))
        .send()
        .await
        .expect("Failed to send issue request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let issue_id = body["issue_id"].as_i64().expect("No issue_id");

    let response = client
        .put(format!("{}/issues/{}/return", BASE_URL, issue_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send return request");

    assert!(response.status().is_success());

    // Deletion must be refused as a conflict, not fail as a storage error
    let response = client
        .delete(format!("{}/admin/users/{}", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .expect("Failed to send delete request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_delete_book_with_loan_history_conflicts() {
    let client = Client::new();
    let admin_token = get_admin_token(&client).await;
    let (token, _) = register_user(&client, "bookhistory@libris.test").await;

    let response = client
        .post(format!("{}/admin/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({ "title": "Borrowed Once", "stock": 1 }))
        .send()
        .await
        .expect("Failed to create book");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let book_id = body["book_id"].as_i64().expect("No book_id");

    let response = client
        .post(format!("{}/issues", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send issue request");

    assert_eq!(response.status(), 201);

    // The loan row references the book; deletion is a 409, not a 503
    let response = client
        .delete(format!("{}/admin/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .expect("Failed to send delete request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_stock_cannot_drop_below_issued_copies() {
    let client = Client::new();
    let admin_token = get_admin_token(&client).await;
    let (token, _) = register_user(&client, "stockdrop@libris.test").await;

    let response = client
        .post(format!("{}/admin/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({ "title": "Shrinking Stock", "stock": 2 }))
        .send()
        .await
        .expect("Failed to create book");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let book_id = body["book_id"].as_i64().expect("No book_id");

    let response = client
        .post(format!("{}/issues", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send issue request");

    assert_eq!(response.status(), 201);

    // One copy is out; stock 0 would make availability negative
    let response = client
        .put(format!("{}/admin/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({ "stock": 0 }))
        .send()
        .await
        .expect("Failed to send update request");

    assert_eq!(response.status(), 409);

    // Lowering to the issued count is still allowed
    let response = client
        .put(format!("{}/admin/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({ "stock": 1 }))
        .send()
        .await
        .expect("Failed to send update request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["available_copies"], 0);
}

#[tokio::test]
#[ignore]
async fn test_last_copy_is_never_oversold() {
    let client = Client::new();
    let admin_token = get_admin_token(&client).await;

    // A fresh book with a single copy
    let response = client
        .post(format!("{}/admin/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({
            "title": "Single Copy",
            "authors": "Solo Author",
            "stock": 1
        }))
        .send()
        .await
        .expect("Failed to create book");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let book_id = body["book_id"].as_i64().expect("No book_id");

    let (token_a, _) = register_user(&client, "racer-a@libris.test").await;
    let (token_b, _) = register_user(&client, "racer-b@libris.test").await;

    let issue = |token: String| {
        let client = client.clone();
        async move {
            client
                .post(format!("{}/issues", BASE_URL))
                .header("Authorization", format!("Bearer {}", token))
                .json(&json!({ "book_id": book_id }))
                .send()
                .await
                .expect("Failed to send issue request")
                .status()
        }
    };

    let (status_a, status_b) = tokio::join!(issue(token_a), issue(token_b));

    let successes = [status_a, status_b]
        .iter()
        .filter(|s| s.as_u16() == 201)
        .count();
    let conflicts = [status_a, status_b]
        .iter()
        .filter(|s| s.as_u16() == 409)
        .count();

    assert_eq!(successes, 1, "exactly one issue must win the last copy");
    assert_eq!(conflicts, 1, "the loser must get a conflict, not an error");
}

#[tokio::test]
#[ignore]
async fn test_admin_registration_requires_key() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/admin/register", BASE_URL))
        .json(&json!({
            "name": "Rogue Admin",
            "email": "rogue@libris.test",
            "password": "longenough",
            "admin_key": "not-the-key"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}
