mod common;

use anyhow::Result;
use creations_api::auth::validate_jwt;
use creations_api::config::AppConfig;
use creations_api::types::Plan;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn missing_token_is_unauthorized() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::Client::new()
        .post(server.url("/api/ai/generate-article"))
        .json(&json!({ "prompt": "tea" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], json!("UNAUTHORIZED"));
    Ok(())
}

#[tokio::test]
async fn forged_token_is_unauthorized() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::Client::new()
        .get(server.url("/api/user/get-user-creations"))
        .header("Authorization", "Bearer not.a.jwt")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unreachable_identity_provider_is_bad_gateway() -> Result<()> {
    let server = common::ensure_server().await?;

    // Free plans need the stored counter, and the identity provider has no key
    let res = reqwest::Client::new()
        .post(server.url("/api/ai/generate-blog-title"))
        .header("Authorization", common::bearer("user_1", Plan::Free)?)
        .json(&json!({ "prompt": "tea" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    Ok(())
}

#[tokio::test]
async fn token_command_mints_a_verifiable_token() -> Result<()> {
    let output = common::isolated_command()
        .args(["token", "--user", "user_42", "--plan", "premium"])
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let token = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .expect("token printed");

    let mut config = AppConfig::development();
    config.security.jwt_secret = common::JWT_SECRET.to_string();
    let claims = validate_jwt(token, &config.security)?;

    assert_eq!(claims.sub, "user_42");
    assert_eq!(claims.plan(), Plan::Premium);
    Ok(())
}
