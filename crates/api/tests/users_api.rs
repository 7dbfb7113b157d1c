//! HTTP-level tests for admin user management.

mod common;

use axum::http::StatusCode;
use baitong_core::roles::Role;
use common::{body_json, delete_auth, get_auth, post_json, post_json_auth, put_json_auth, token_for};
use serde_json::json;
use sqlx::PgPool;

/// Id of the calling admin. Kept clear of the ids that fresh rows receive.
const ADMIN_ID: i64 = 9_999;

fn admin() -> String {
    token_for(ADMIN_ID, "admin", Role::Admin)
}

async fn create(app: axum::Router, body: serde_json::Value) -> axum::response::Response {
    post_json_auth(app, "/api/users", body, &admin()).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_user_and_log_in(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = create(
        app.clone(),
        json!({ "identity": "officer@maff.gov.kh", "password": "long-enough", "role": "ministry" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let user = body_json(response).await["data"].clone();
    assert_eq!(user["role"], "ministry");
    assert_eq!(user["status"], "active");
    assert!(user.get("passwordHash").is_none());

    let login = post_json(
        app,
        "/api/auth/login",
        json!({ "identity": "officer@maff.gov.kh", "password": "long-enough" }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_validation_errors(pool: PgPool) {
    let app = common::build_test_app(pool);

    let missing = create(app.clone(), json!({ "identity": "x" })).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(missing).await["error"],
        "identity, password and role are required"
    );

    let bad_role = create(
        app.clone(),
        json!({ "identity": "x", "password": "long-enough", "role": "farmer" }),
    )
    .await;
    assert_eq!(bad_role.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(bad_role).await["error"],
        "role must be one of: admin, ministry"
    );

    let short = create(app, json!({ "identity": "x", "password": "short", "role": "admin" })).await;
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_identity_is_409(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({ "identity": "dup", "password": "long-enough", "role": "ministry" });

    assert_eq!(create(app.clone(), body.clone()).await.status(), StatusCode::CREATED);

    let again = create(app, body).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(again).await["error"], "Identity already exists");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_status_and_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let created = body_json(
        create(
            app.clone(),
            json!({ "identity": "field-1", "password": "long-enough", "role": "ministry" }),
        )
        .await,
    )
    .await;
    let uri = format!("/api/users/{}", created["data"]["id"]);

    let bad = put_json_auth(app.clone(), &uri, json!({ "status": "archived" }), &admin()).await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(bad).await["error"],
        "status must be one of: active, disabled"
    );

    let empty = put_json_auth(app.clone(), &uri, json!({}), &admin()).await;
    assert_eq!(body_json(empty).await["error"], "No fields to update");

    let ok = put_json_auth(
        app.clone(),
        &uri,
        json!({ "status": "disabled", "password": "brand-new-pass" }),
        &admin(),
    )
    .await;
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(body_json(ok).await["data"]["status"], "disabled");

    let login = post_json(
        app,
        "/api/auth/login",
        json!({ "identity": "field-1", "password": "brand-new-pass" }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_user_is_hard_and_404s_after(pool: PgPool) {
    let app = common::build_test_app(pool);
    let created = body_json(
        create(
            app.clone(),
            json!({ "identity": "temp", "password": "long-enough", "role": "ministry" }),
        )
        .await,
    )
    .await;
    let uri = format!("/api/users/{}", created["data"]["id"]);

    assert_eq!(delete_auth(app.clone(), &uri, &admin()).await.status(), StatusCode::OK);

    let gone = get_auth(app.clone(), &uri, &admin()).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(gone).await["error"], "User not found");

    assert_eq!(
        delete_auth(app, &uri, &admin()).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_cannot_delete_self(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/users/{ADMIN_ID}"), &admin()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
