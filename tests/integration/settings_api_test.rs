// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, send, ADMIN_TOKEN};
use axum::http::StatusCode;
use global_settings::domain::models::global_settings::GLOBAL_SETTINGS_CACHE_KEY;
use serde_json::{json, Value};

fn update_body(maintenance_mode: bool, message: &str) -> Value {
    json!({
        "maintenance_mode": maintenance_mode,
        "maintenance_message": message,
        "max_users_per_organization": 1000,
        "max_session_duration": 480,
        "password_min_length": 8,
        "require_mfa": false,
        "allow_registration": true,
        "email_verification_required": true,
        "token_expiration_minutes": 60,
        "audit_log_retention_days": 90
    })
}

/// 管理接口要求令牌
#[tokio::test]
async fn settings_endpoint_returns_401_without_token() {
    let app = create_test_app().await;

    let (status, _) = send(&app, "GET", "/v1/admin/settings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/v1/admin/settings", Some("wrong"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// 空库读取返回默认设置并写入缓存
#[tokio::test]
async fn get_settings_returns_defaults_on_empty_store() {
    let app = create_test_app().await;

    let (status, body) = send(&app, "GET", "/v1/admin/settings", Some(ADMIN_TOKEN), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "default");
    assert_eq!(body["maintenance_mode"], false);
    assert_eq!(body["max_users_per_organization"], 1000);
    assert_eq!(body["max_session_duration"], 480);
    assert_eq!(body["password_min_length"], 8);
    assert_eq!(body["require_mfa"], false);
    assert_eq!(body["allow_registration"], true);
    assert_eq!(body["email_verification_required"], true);
    assert_eq!(body["token_expiration_minutes"], 60);
    assert_eq!(body["audit_log_retention_days"], 90);
    assert_eq!(body["settings"], "{}");
    assert!(app.cache.contains_key(GLOBAL_SETTINGS_CACHE_KEY));
}

/// 更新进入维护模式后，后续读取看到新值而不是旧缓存
#[tokio::test]
async fn update_enables_maintenance_and_invalidates_cache() {
    let app = create_test_app().await;

    let (_, before) = send(&app, "GET", "/v1/admin/settings", Some(ADMIN_TOKEN), None).await;

    let (status, updated) = send(
        &app,
        "PUT",
        "/v1/admin/settings",
        Some(ADMIN_TOKEN),
        Some(update_body(true, "down for maintenance")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], "default");
    assert_eq!(updated["maintenance_mode"], true);
    assert_eq!(updated["maintenance_message"], "down for maintenance");
    assert_eq!(updated["created_at"], before["created_at"]);
    assert_eq!(app.cache.stats().deletes, 1);

    let (_, after) = send(&app, "GET", "/v1/admin/settings", Some(ADMIN_TOKEN), None).await;
    assert_eq!(after["maintenance_mode"], true);
    assert_eq!(after["maintenance_message"], "down for maintenance");
}

/// 超出范围的字段返回 400 且不修改存储
#[tokio::test]
async fn update_with_invalid_fields_returns_400() {
    let app = create_test_app().await;

    let mut body = update_body(false, "");
    body["password_min_length"] = json!(3);

    let (status, response) = send(
        &app,
        "PUT",
        "/v1/admin/settings",
        Some(ADMIN_TOKEN),
        Some(body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"]
        .as_str()
        .unwrap_or_default()
        .contains("password_min_length"));

    let (_, current) = send(&app, "GET", "/v1/admin/settings", Some(ADMIN_TOKEN), None).await;
    assert_eq!(current["password_min_length"], 8);
}
