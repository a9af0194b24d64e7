/// Integration tests for the TaskDeck API
///
/// These tests verify the full system works end-to-end:
/// - Registration and login flows with hashed credentials
/// - Bearer token authentication on protected endpoints
/// - Task lifecycle (create → read → update → delete)
/// - Ownership isolation between users
/// - Partial updates, including description clearing
///
/// They run against the database named by DATABASE_URL and skip when it is
/// not set.

mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{body_json, unique_email, TestContext};
use serde_json::json;
use std::time::Duration;
use taskdeck_api::error::ApiError;
use taskdeck_shared::models::user::{CreateUser, User};
use uuid::Uuid;

/// Test that registration returns a usable token and the public user shape
#[tokio::test]
async fn test_register_returns_token_and_user() {
    let mut ctx = match TestContext::try_new().await {
        Some(ctx) => ctx,
        None => return,
    };

    let email = unique_email("register");
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(
            json!({
                "email": email,
                "password": "correct-horse",
                "first_name": "Ada",
                "last_name": "Lovelace"
            })
            .to_string(),
        ))
        .expect("Should build request");

    let response = ctx.request(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["access_token"].is_string());
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["first_name"], "Ada");
    assert_eq!(body["user"]["last_name"], "Lovelace");
    assert_eq!(body["user"]["is_active"], true);
    assert!(body["user"]["created_at"].is_string());

    // The hash must never appear in any response shape
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());

    let user_id: Uuid = body["user"]["id"]
        .as_str()
        .expect("Should have user id")
        .parse()
        .expect("User id should be a UUID");
    ctx.created_users.push(user_id);

    ctx.cleanup().await.expect("Should clean up test data");
}

/// Test that a second registration with the same email is rejected
#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let mut ctx = match TestContext::try_new().await {
        Some(ctx) => ctx,
        None => return,
    };

    let email = unique_email("duplicate");
    ctx.register_user(&email, "first-password").await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(
            json!({
                "email": email,
                "password": "second-password",
                "first_name": "Other",
                "last_name": "Person"
            })
            .to_string(),
        ))
        .expect("Should build request");

    let response = ctx.request(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Email already registered");

    ctx.cleanup().await.expect("Should clean up test data");
}

/// Test that the unique constraint catches a duplicate insert on its own
///
/// Two concurrent registrations can both pass the pre-check before either
/// row exists; the second insert then reaches the database. This drives
/// `User::create` directly, past the pre-check, and verifies the
/// constraint violation maps to the same duplicate-account response.
#[tokio::test]
async fn test_duplicate_insert_maps_to_duplicate_account() {
    let mut ctx = match TestContext::try_new().await {
        Some(ctx) => ctx,
        None => return,
    };

    let email = unique_email("race");
    ctx.register_user(&email, "first-password").await;

    let err = User::create(
        &ctx.db,
        CreateUser {
            email: email.clone(),
            password_hash: "$argon2id$placeholder".to_string(),
            first_name: None,
            last_name: None,
        },
    )
    .await
    .expect_err("Second insert with the same email should fail");

    // users_email_key is the authoritative duplicate-account enforcement;
    // it answers exactly like the pre-check
    let api_err: ApiError = err.into();
    match api_err {
        ApiError::BadRequest(msg) => assert_eq!(msg, "Email already registered"),
        other => panic!("Expected BadRequest, got {:?}", other),
    }

    ctx.cleanup().await.expect("Should clean up test data");
}

/// Test that registration lowercases the email for storage and lookup
#[tokio::test]
async fn test_register_normalizes_email_case() {
    let mut ctx = match TestContext::try_new().await {
        Some(ctx) => ctx,
        None => return,
    };

    let email = unique_email("case");
    let shouting = email.to_uppercase();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(
            json!({
                "email": shouting,
                "password": "case-insensitive",
                "first_name": "Test",
                "last_name": "User"
            })
            .to_string(),
        ))
        .expect("Should build request");

    let response = ctx.request(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], email);

    let user_id: Uuid = body["user"]["id"]
        .as_str()
        .expect("Should have user id")
        .parse()
        .expect("User id should be a UUID");
    ctx.created_users.push(user_id);

    // Login with the original casing reaches the same account
    let token = ctx.login_user(&shouting, "case-insensitive").await;
    assert!(!token.is_empty());

    ctx.cleanup().await.expect("Should clean up test data");
}

/// Test login success and the generic rejection for bad credentials
#[tokio::test]
async fn test_login_flow() {
    let mut ctx = match TestContext::try_new().await {
        Some(ctx) => ctx,
        None => return,
    };

    let email = unique_email("login");
    ctx.register_user(&email, "right-password").await;

    // Correct credentials return a fresh token
    let token = ctx.login_user(&email, "right-password").await;
    assert!(!token.is_empty());

    // Wrong password and unknown account get byte-identical rejections
    for (attempt_email, attempt_password) in [
        (email.as_str(), "wrong-password"),
        ("nobody@example.com", "right-password"),
    ] {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(
                json!({
                    "email": attempt_email,
                    "password": attempt_password
                })
                .to_string(),
            ))
            .expect("Should build request");

        let response = ctx.request(request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Incorrect email or password");
    }

    ctx.cleanup().await.expect("Should clean up test data");
}

/// Test that a deactivated account cannot log in
#[tokio::test]
async fn test_login_rejects_inactive_user() {
    let mut ctx = match TestContext::try_new().await {
        Some(ctx) => ctx,
        None => return,
    };

    let email = unique_email("inactive");
    let (_, user_id) = ctx.register_user(&email, "soon-disabled").await;

    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user_id)
        .execute(&ctx.db)
        .await
        .expect("Should deactivate user");

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(
            json!({
                "email": email,
                "password": "soon-disabled"
            })
            .to_string(),
        ))
        .expect("Should build request");

    let response = ctx.request(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Same message as a bad password, so probing reveals nothing
    let body = body_json(response).await;
    assert_eq!(body["message"], "Incorrect email or password");

    ctx.cleanup().await.expect("Should clean up test data");
}

/// Test that /auth/me returns the authenticated user's profile
#[tokio::test]
async fn test_me_returns_current_user() {
    let mut ctx = match TestContext::try_new().await {
        Some(ctx) => ctx,
        None => return,
    };

    let email = unique_email("me");
    let (token, user_id) = ctx.register_user(&email, "profile-check").await;

    let response = ctx.authed_get("/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], user_id.to_string());
    assert_eq!(body["email"], email);
    assert!(body.get("password_hash").is_none());

    ctx.cleanup().await.expect("Should clean up test data");
}

/// Test that /auth/verify reports validity and remaining lifetime
#[tokio::test]
async fn test_verify_reports_token_expiry() {
    let mut ctx = match TestContext::try_new().await {
        Some(ctx) => ctx,
        None => return,
    };

    let email = unique_email("verify");
    let (token, user_id) = ctx.register_user(&email, "verify-check").await;

    let response = ctx.authed_send("POST", "/auth/verify", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["user"]["id"], user_id.to_string());
    assert_eq!(body["user"]["email"], email);

    // Tokens carry a 30 minute lifetime in the test configuration
    let expires_in = body["expiresIn"].as_i64().expect("Should have expiresIn");
    assert!(expires_in > 0, "Fresh token should not be expired");
    assert!(expires_in <= 30 * 60, "Lifetime cannot exceed the TTL");

    ctx.cleanup().await.expect("Should clean up test data");
}

/// Test that logout acknowledges without invalidating the token
#[tokio::test]
async fn test_logout_is_stateless() {
    let mut ctx = match TestContext::try_new().await {
        Some(ctx) => ctx,
        None => return,
    };

    let email = unique_email("logout");
    let (token, _) = ctx.register_user(&email, "logout-check").await;

    let response = ctx.authed_send("POST", "/auth/logout", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Logged out successfully");

    // No server-side session exists, so the token still verifies until
    // it expires on its own
    let response = ctx.authed_send("POST", "/auth/verify", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    ctx.cleanup().await.expect("Should clean up test data");
}

/// Test the full task lifecycle for a single owner
#[tokio::test]
async fn test_task_crud_cycle() {
    let mut ctx = match TestContext::try_new().await {
        Some(ctx) => ctx,
        None => return,
    };

    let email = unique_email("crud");
    let (token, user_id) = ctx.register_user(&email, "task-owner").await;

    // Create
    let task = ctx
        .create_task(
            &token,
            json!({
                "title": "Write quarterly report",
                "description": "Numbers for Q3",
                "priority": "high"
            }),
        )
        .await;

    assert!(task["id"].is_string());
    assert_eq!(task["owner_id"], user_id.to_string());
    assert_eq!(task["title"], "Write quarterly report");
    assert_eq!(task["description"], "Numbers for Q3");
    assert_eq!(task["completed"], false);
    assert_eq!(task["priority"], "high");
    assert!(task["created_at"].is_string());
    assert!(task["updated_at"].is_string());

    let task_id = task["id"].as_str().expect("Should have task id");

    // Read
    let response = ctx.authed_get(&format!("/tasks/{}", task_id), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["id"], task["id"]);
    assert_eq!(fetched["title"], "Write quarterly report");

    // List
    let response = ctx.authed_get("/tasks", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    let tasks = listing.as_array().expect("Listing should be an array");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], task["id"]);

    // Update
    let response = ctx
        .authed_json(
            "PUT",
            &format!("/tasks/{}", task_id),
            &token,
            json!({ "completed": true }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["completed"], true);

    // Delete
    let response = ctx
        .authed_send("DELETE", &format!("/tasks/{}", task_id), &token)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Task deleted successfully");

    // Reads and repeat deletes after deletion both miss
    let response = ctx.authed_get(&format!("/tasks/{}", task_id), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .authed_send("DELETE", &format!("/tasks/{}", task_id), &token)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await.expect("Should clean up test data");
}

/// Test that updates only touch the fields present in the body
#[tokio::test]
async fn test_task_update_is_partial() {
    let mut ctx = match TestContext::try_new().await {
        Some(ctx) => ctx,
        None => return,
    };

    let email = unique_email("partial");
    let (token, _) = ctx.register_user(&email, "partial-update").await;

    let task = ctx
        .create_task(
            &token,
            json!({
                "title": "Original title",
                "description": "Original description",
                "priority": "low"
            }),
        )
        .await;
    let task_id = task["id"].as_str().expect("Should have task id");

    // Absent fields survive the update untouched
    let response = ctx
        .authed_json(
            "PUT",
            &format!("/tasks/{}", task_id),
            &token,
            json!({ "completed": true }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["title"], "Original title");
    assert_eq!(updated["description"], "Original description");
    assert_eq!(updated["priority"], "low");

    // An explicit null clears the description, absence would not
    let response = ctx
        .authed_json(
            "PUT",
            &format!("/tasks/{}", task_id),
            &token,
            json!({ "description": null }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = body_json(response).await;
    assert!(cleared["description"].is_null());
    assert_eq!(cleared["title"], "Original title");
    assert_eq!(cleared["completed"], true);

    ctx.cleanup().await.expect("Should clean up test data");
}

/// Test that an empty update body still advances updated_at
#[tokio::test]
async fn test_empty_update_touches_timestamp() {
    let mut ctx = match TestContext::try_new().await {
        Some(ctx) => ctx,
        None => return,
    };

    let email = unique_email("touch");
    let (token, _) = ctx.register_user(&email, "timestamp-check").await;

    let task = ctx.create_task(&token, json!({ "title": "Untouched" })).await;
    let task_id = task["id"].as_str().expect("Should have task id");
    let created_at: DateTime<Utc> = task["updated_at"]
        .as_str()
        .expect("Should have updated_at")
        .parse()
        .expect("Should parse timestamp");

    tokio::time::sleep(Duration::from_millis(50)).await;

    let response = ctx
        .authed_json("PUT", &format!("/tasks/{}", task_id), &token, json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    let updated_at: DateTime<Utc> = updated["updated_at"]
        .as_str()
        .expect("Should have updated_at")
        .parse()
        .expect("Should parse timestamp");

    assert!(updated_at > created_at);
    assert_eq!(updated["title"], "Untouched");

    ctx.cleanup().await.expect("Should clean up test data");
}

/// Test that the listing returns the owner's tasks newest first
#[tokio::test]
async fn test_task_listing_is_newest_first() {
    let mut ctx = match TestContext::try_new().await {
        Some(ctx) => ctx,
        None => return,
    };

    let email = unique_email("listing");
    let (token, _) = ctx.register_user(&email, "list-order").await;

    for title in ["First task", "Second task", "Third task"] {
        ctx.create_task(&token, json!({ "title": title })).await;
        // Keep creation timestamps strictly ordered
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let response = ctx.authed_get("/tasks", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let listing = body_json(response).await;
    let tasks = listing.as_array().expect("Listing should be an array");
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0]["title"], "Third task");
    assert_eq!(tasks[1]["title"], "Second task");
    assert_eq!(tasks[2]["title"], "First task");

    ctx.cleanup().await.expect("Should clean up test data");
}

/// Test that one user's tasks are invisible to another user
#[tokio::test]
async fn test_task_isolation_between_users() {
    let mut ctx = match TestContext::try_new().await {
        Some(ctx) => ctx,
        None => return,
    };

    let (owner_token, _) = ctx
        .register_user(&unique_email("owner"), "owner-password")
        .await;
    let (intruder_token, _) = ctx
        .register_user(&unique_email("intruder"), "intruder-password")
        .await;

    let task = ctx
        .create_task(&owner_token, json!({ "title": "Private task" }))
        .await;
    let task_id = task["id"].as_str().expect("Should have task id");
    let task_uri = format!("/tasks/{}", task_id);

    // Every access path misses identically for the non-owner
    let response = ctx.authed_get(&task_uri, &intruder_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Task not found or you don't have permission to access it"
    );

    let response = ctx
        .authed_json("PUT", &task_uri, &intruder_token, json!({ "completed": true }))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx.authed_send("DELETE", &task_uri, &intruder_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The other user's listing stays empty
    let response = ctx.authed_get("/tasks", &intruder_token).await;
    let listing = body_json(response).await;
    assert_eq!(listing.as_array().expect("Should be an array").len(), 0);

    // The failed attempts changed nothing for the owner
    let response = ctx.authed_get(&task_uri, &owner_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let unchanged = body_json(response).await;
    assert_eq!(unchanged["completed"], false);

    ctx.cleanup().await.expect("Should clean up test data");
}

/// Test that titles at the length limits are stored intact
#[tokio::test]
async fn test_task_title_boundary_lengths() {
    let mut ctx = match TestContext::try_new().await {
        Some(ctx) => ctx,
        None => return,
    };

    let email = unique_email("boundary");
    let (token, _) = ctx.register_user(&email, "boundary-check").await;

    let single = ctx.create_task(&token, json!({ "title": "x" })).await;
    assert_eq!(single["title"], "x");

    let longest = "t".repeat(200);
    let task = ctx.create_task(&token, json!({ "title": longest })).await;
    assert_eq!(
        task["title"].as_str().expect("Should have title").len(),
        200
    );

    ctx.cleanup().await.expect("Should clean up test data");
}
