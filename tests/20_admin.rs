mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn setup_only_works_once() -> Result<()> {
    let server = common::start_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.api("/admin/setup"))
        .json(&json!({"username": "admin", "password": "admin123"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["message"], "Admin created successfully");

    let res = client
        .post(server.api("/admin/setup"))
        .json(&json!({"username": "admin", "password": "x"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["detail"], "Admin already exists");

    let res = client
        .post(server.api("/admin/setup"))
        .json(&json!({"username": "other", "password": "other"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(server.api("/admin/setup"))
        .json(&json!({"username": "", "password": ""}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["detail"], "Admin already exists");

    // The first password still works
    let res = client
        .post(server.api("/admin/login"))
        .json(&json!({"username": "admin", "password": "admin123"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Login successful");
    assert!(body["token"].as_str().map(|t| t.split('.').count() == 3).unwrap_or(false));
    Ok(())
}

#[tokio::test]
async fn login_failures_are_indistinguishable() -> Result<()> {
    let server = common::start_server().await?;
    let client = reqwest::Client::new();
    common::admin_token(&server).await?;

    let wrong_password = client
        .post(server.api("/admin/login"))
        .json(&json!({"username": "admin", "password": "wrong"}))
        .send()
        .await?;
    let unknown_user = client
        .post(server.api("/admin/login"))
        .json(&json!({"username": "nobody", "password": "admin123"}))
        .send()
        .await?;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let a = wrong_password.json::<Value>().await?;
    let b = unknown_user.json::<Value>().await?;
    assert_eq!(a, b);
    assert_eq!(a["detail"], "Invalid credentials");
    Ok(())
}

#[tokio::test]
async fn login_before_setup_is_unauthorized() -> Result<()> {
    let server = common::start_server().await?;
    let res = reqwest::Client::new()
        .post(server.api("/admin/login"))
        .json(&json!({"username": "admin", "password": "admin123"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
