//! Signed object download tests
//!
//! Covers the round trip from an issued URL back to the object bytes, and
//! rejection of tampered, expired and unsigned requests.

mod helpers;

use axum::http::{header, StatusCode};
use helpers::*;

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[tokio::test]
async fn test_issued_url_serves_object() {
    let app = setup_app().await;
    let (_, body) = app
        .get_json(&format!(
            "/api/mosaic/orthomosaic?site={}&sector={}&period={}&pad_id={}",
            SITE, SECTOR, PERIOD, PAD
        ))
        .await;

    let uri = local_uri(body["url"].as_str().unwrap());
    let response = app.get(&uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/tiff");
    assert_eq!(extract_bytes(response.into_body()).await, b"II*\0orthophoto");
}

#[tokio::test]
async fn test_issued_image_url_content_type() {
    let app = setup_app().await;
    let (_, body) = app.get_json("/api/optical/cap-001").await;

    let response = app.get(&local_uri(body["url"].as_str().unwrap())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
}

#[tokio::test]
async fn test_tampered_signature_is_forbidden() {
    let app = setup_app().await;
    let expires = now() + 600;
    let mut signature = signer().signature(ORTHOPHOTO_KEY, expires);
    let last = if signature.ends_with('0') { "1" } else { "0" };
    signature.pop();
    signature.push_str(last);

    let (status, body) = app
        .get_json(&format!(
            "/objects/{}?expires={}&signature={}",
            ORTHOPHOTO_KEY, expires, signature
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_signature_bound_to_key_and_expiry() {
    let app = setup_app().await;
    let expires = now() + 600;
    let signature = signer().signature(ORTHOPHOTO_KEY, expires);

    // Same signature presented for another object
    let (status, _) = app
        .get_json(&format!(
            "/objects/optical/cap-001.jpg?expires={}&signature={}",
            expires, signature
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Extended expiry
    let (status, _) = app
        .get_json(&format!(
            "/objects/{}?expires={}&signature={}",
            ORTHOPHOTO_KEY,
            expires + 3600,
            signature
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_expired_url_is_forbidden() {
    let app = setup_app().await;
    let expires = now() - 10;
    let signature = signer().signature(ORTHOPHOTO_KEY, expires);

    let (status, _) = app
        .get_json(&format!(
            "/objects/{}?expires={}&signature={}",
            ORTHOPHOTO_KEY, expires, signature
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unsigned_request_is_forbidden() {
    let app = setup_app().await;
    let (status, _) = app.get_json(&format!("/objects/{}", ORTHOPHOTO_KEY)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_signed_missing_object_is_not_found() {
    let app = setup_app().await;
    let key = "optical/cap-404.jpg";
    let expires = now() + 600;

    let (status, body) = app
        .get_json(&format!(
            "/objects/{}?expires={}&signature={}",
            key,
            expires,
            signer().signature(key, expires)
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_signed_traversal_key_is_rejected() {
    let app = setup_app().await;
    let key = "optical/../../thermal.db";
    let expires = now() + 600;

    let (status, _) = app
        .get_json(&format!(
            "/objects/{}?expires={}&signature={}",
            key,
            expires,
            signer().signature(key, expires)
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
