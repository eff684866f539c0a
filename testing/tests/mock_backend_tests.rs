//! Sanity checks on the mock services themselves, using a bare reqwest
//! client so failures here point at the mock rather than the API client.

use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use testing::{MockBackend, ACCESS_COOKIE, TEST_PASSWORD};

#[test_log::test(actix_web::test)]
async fn mock_rejects_requests_without_session_cookie() -> Result<()> {
    let backend = MockBackend::start().await?;

    let res = reqwest::Client::new()
        .get(format!("{}/exam/exams", backend.origin()))
        .send()
        .await?;

    assert_eq!(res.status().as_u16(), 401);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "TOKEN_EXPIRED");

    backend.stop().await;
    Ok(())
}

#[test_log::test(actix_web::test)]
async fn mock_login_sets_session_cookies() -> Result<()> {
    let backend = MockBackend::start().await?;

    let res = reqwest::Client::new()
        .post(format!("{}/auth/login", backend.origin()))
        .header("X-Tenant-Slug", "acme")
        .json(&json!({ "loginId": "kim01", "password": TEST_PASSWORD }))
        .send()
        .await?;

    assert!(res.status().is_success());
    let cookies: Vec<String> = res.cookies().map(|c| c.name().to_string()).collect();
    assert!(cookies.contains(&ACCESS_COOKIE.to_string()));
    let body: Value = res.json().await?;
    assert_eq!(body["user"]["tenantSlug"], "acme");

    backend.stop().await;
    Ok(())
}

#[test_log::test(actix_web::test)]
async fn mock_refresh_requires_refresh_cookie() -> Result<()> {
    let backend = MockBackend::start().await?;

    let res = reqwest::Client::new()
        .post(format!("{}/auth/refresh", backend.origin()))
        .send()
        .await?;

    assert_eq!(res.status().as_u16(), 401);
    assert_eq!(backend.refresh_calls(), 1);

    backend.stop().await;
    Ok(())
}
