//! Receipt API integration tests.
//!
//! Run with: `cargo test -p tally-api --test receipts_test`

mod helpers;

use helpers::fixtures::{create_jpeg_bytes, create_minimal_png, receipt_form, VALID_RECEIPT_JSON};
use helpers::{setup_test_app, setup_test_app_with_limit, GatewayReply};
use serde_json::Value;
use tally_db::ReceiptRepository;

fn valid_reply() -> GatewayReply {
    GatewayReply::Text(VALID_RECEIPT_JSON.to_string())
}

#[tokio::test]
async fn test_extract_valid_receipt() {
    let app = setup_test_app(valid_reply()).await;
    let client = app.client();

    let response = client
        .post("/api/receipts/extract")
        .multipart(receipt_form("receipt", create_jpeg_bytes(), "receipt.jpg", "image/jpeg"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();

    let id = body["id"].as_str().expect("Expected 'id' in response");
    assert!(uuid::Uuid::parse_str(id).is_ok());
    assert_eq!(body["date"], "2024-01-15");
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["vendor_name"], "Test Store");
    assert_eq!(body["receipt_items"].as_array().unwrap().len(), 2);
    assert_eq!(body["receipt_items"][0]["item_name"], "Coffee");
    assert_eq!(body["receipt_items"][0]["item_cost"], 4.5);
    assert_eq!(body["tax"], 1.35);
    assert_eq!(body["total"], 14.84);

    let image_url = body["image_url"].as_str().unwrap();
    assert!(image_url.contains("/uploads/"));
    assert!(image_url.ends_with(".jpg"));

    assert_eq!(app.stored_file_count(), 1);
    assert!(app.repository.get_by_id(id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_extract_accepts_file_field_name() {
    let app = setup_test_app(valid_reply()).await;

    let response = app
        .client()
        .post("/api/receipts/extract")
        .multipart(receipt_form("file", create_minimal_png(), "scan.png", "image/png"))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(app.gateway.mime_types(), vec!["image/png".to_string()]);
}

#[tokio::test]
async fn test_extract_jpg_alias_forwarded_as_jpeg() {
    let app = setup_test_app(valid_reply()).await;

    let response = app
        .client()
        .post("/api/receipts/extract")
        .multipart(receipt_form("receipt", create_jpeg_bytes(), "r.jpg", "image/jpg"))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(app.gateway.mime_types(), vec!["image/jpeg".to_string()]);
}

#[tokio::test]
async fn test_extract_fenced_reply() {
    let fenced = format!("```json\n{}\n```", VALID_RECEIPT_JSON);
    let app = setup_test_app(GatewayReply::Text(fenced)).await;

    let response = app
        .client()
        .post("/api/receipts/extract")
        .multipart(receipt_form("receipt", create_jpeg_bytes(), "receipt.jpg", "image/jpeg"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["vendor_name"], "Test Store");
}

#[tokio::test]
async fn test_extract_rejects_non_image() {
    let app = setup_test_app(valid_reply()).await;

    let response = app
        .client()
        .post("/api/receipts/extract")
        .multipart(receipt_form("receipt", b"hello".to_vec(), "notes.txt", "text/plain"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Invalid file type. Only JPEG, JPG, PNG and WEBP images are allowed."
    );

    assert_eq!(app.stored_file_count(), 0);
    assert_eq!(app.gateway.calls(), 0);
    assert!(app.repository.is_empty().await);
}

#[tokio::test]
async fn test_extract_without_file() {
    let app = setup_test_app(valid_reply()).await;

    let form = axum_test::multipart::MultipartForm::new().add_text("note", "no image here");
    let response = app
        .client()
        .post("/api/receipts/extract")
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file uploaded");
    assert_eq!(app.gateway.calls(), 0);
}

#[tokio::test]
async fn test_extract_invalid_json_reply() {
    let app = setup_test_app(GatewayReply::Text("invalid json response".to_string())).await;

    let response = app
        .client()
        .post("/api/receipts/extract")
        .multipart(receipt_form("receipt", create_jpeg_bytes(), "receipt.jpg", "image/jpeg"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["error"], "AI model returned invalid response format");
    assert!(app.repository.is_empty().await);
    // The image was stored before the model was called
    assert_eq!(app.stored_file_count(), 1);
}

#[tokio::test]
async fn test_extract_invalid_currency_reply() {
    let reply = VALID_RECEIPT_JSON.replace("\"USD\"", "\"INVALID\"");
    let app = setup_test_app(GatewayReply::Text(reply)).await;

    let response = app
        .client()
        .post("/api/receipts/extract")
        .multipart(receipt_form("receipt", create_jpeg_bytes(), "receipt.jpg", "image/jpeg"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["error"], "AI model returned incomplete or invalid data");
    assert!(app.repository.is_empty().await);
}

#[tokio::test]
async fn test_extract_reply_missing_required_fields() {
    let mut reply: Value = serde_json::from_str(VALID_RECEIPT_JSON).unwrap();
    let fields = reply.as_object_mut().unwrap();
    fields.remove("currency");
    fields.remove("vendor_name");
    let app = setup_test_app(GatewayReply::Text(reply.to_string())).await;

    let response = app
        .client()
        .post("/api/receipts/extract")
        .multipart(receipt_form("receipt", create_jpeg_bytes(), "receipt.jpg", "image/jpeg"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["error"], "AI model returned incomplete or invalid data");
    assert_eq!(body["code"], "AI_RESPONSE_CONTENT_ERROR");
    assert!(app.repository.is_empty().await);
    assert_eq!(app.gateway.calls(), 1);
}

#[tokio::test]
async fn test_extract_gateway_failure_hides_detail() {
    let app = setup_test_app(GatewayReply::Failure(
        "upstream 529: overloaded_error".to_string(),
    ))
    .await;

    let response = app
        .client()
        .post("/api/receipts/extract")
        .multipart(receipt_form("receipt", create_jpeg_bytes(), "receipt.jpg", "image/jpeg"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["error"], "Failed to process receipt image");
    assert!(!body.to_string().contains("overloaded_error"));
}

#[tokio::test]
async fn test_extract_oversized_file_rejected() {
    let app = setup_test_app_with_limit(valid_reply(), 1024).await;

    let mut data = create_jpeg_bytes();
    data.resize(2048, 0);

    let response = app
        .client()
        .post("/api/receipts/extract")
        .multipart(receipt_form("receipt", data, "big.jpg", "image/jpeg"))
        .await;

    assert_eq!(response.status_code(), 413);
    assert_eq!(app.gateway.calls(), 0);
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn test_same_image_twice_gives_distinct_records() {
    let app = setup_test_app(valid_reply()).await;
    let client = app.client();

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let response = client
            .post("/api/receipts/extract")
            .multipart(receipt_form("receipt", create_jpeg_bytes(), "receipt.jpg", "image/jpeg"))
            .await;
        assert_eq!(response.status_code(), 200);
        bodies.push(response.json::<Value>());
    }

    assert_ne!(bodies[0]["id"], bodies[1]["id"]);
    assert_ne!(bodies[0]["image_url"], bodies[1]["image_url"]);
    assert_eq!(bodies[0]["receipt_items"], bodies[1]["receipt_items"]);
    assert_eq!(bodies[0]["total"], bodies[1]["total"]);
    assert_eq!(app.stored_file_count(), 2);
}

#[tokio::test]
async fn test_list_and_get_receipts() {
    let app = setup_test_app(valid_reply()).await;
    let client = app.client();

    let empty = client.get("/api/receipts").await;
    assert_eq!(empty.status_code(), 200);
    assert_eq!(empty.json::<Value>(), serde_json::json!([]));

    let created: Value = client
        .post("/api/receipts/extract")
        .multipart(receipt_form("receipt", create_jpeg_bytes(), "receipt.jpg", "image/jpeg"))
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    let listed: Value = client.get("/api/receipts").await.json();
    assert_eq!(listed, serde_json::json!([created.clone()]));

    let fetched = client.get(&format!("/api/receipts/{}", id)).await;
    assert_eq!(fetched.status_code(), 200);
    assert_eq!(fetched.json::<Value>(), created);
}

#[tokio::test]
async fn test_get_unknown_receipt() {
    let app = setup_test_app(valid_reply()).await;

    let response = app.client().get("/api/receipts/does-not-exist").await;

    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["error"], "Receipt not found");
}

#[tokio::test]
async fn test_stored_image_is_served() {
    let app = setup_test_app(valid_reply()).await;
    let client = app.client();
    let png = create_minimal_png();

    let created: Value = client
        .post("/api/receipts/extract")
        .multipart(receipt_form("receipt", png.clone(), "scan.png", "image/png"))
        .await
        .json();

    let image_url = created["image_url"].as_str().unwrap();
    let response = client.get(image_url).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.as_bytes().to_vec(), png);
}

#[tokio::test]
async fn test_samples_listing() {
    let app = setup_test_app(valid_reply()).await;

    let missing: Value = app.client().get("/api/samples").await.json();
    assert_eq!(missing, serde_json::json!([]));

    std::fs::create_dir_all(&app.samples_dir).unwrap();
    std::fs::write(app.samples_dir.join("grocery.jpg"), create_jpeg_bytes()).unwrap();
    std::fs::write(app.samples_dir.join("README.md"), b"not an image").unwrap();

    let listed: Value = app.client().get("/api/samples").await.json();
    assert_eq!(
        listed,
        serde_json::json!([{"name": "grocery.jpg", "url": "/samples/grocery.jpg"}])
    );
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app(valid_reply()).await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>(), serde_json::json!({"status": "alive"}));
}
