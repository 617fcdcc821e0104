use item_manager_api::{
    ApiError, Attachment, ItemClient, ItemFields, ItemQuery, ItemService, SortField, SortOrder,
};
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn setup_client(server_uri: &str) -> ItemClient {
    ItemClient::new(server_uri, reqwest::Client::new()).unwrap()
}

fn sample_fields() -> ItemFields {
    ItemFields {
        name: "Lamp".to_string(),
        item_type: "lighting".to_string(),
        category: "home".to_string(),
        price: Some(19.5),
    }
}

#[tokio::test]
async fn test_list_without_params() {
    let server = MockServer::start().await;
    let client = setup_client(&server.uri());

    Mock::given(method("GET"))
        .and(path("/item"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "B", "type": "t", "category": "c", "price": 10},
            {"id": 2, "name": "A", "type": "t", "category": "c", "price": 20, "imageUrl": "/uploads/a.png"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let items = client.list(&ItemQuery::new()).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "B");
    assert_eq!(items[1].image_url.as_deref(), Some("/uploads/a.png"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_list_with_search_and_sort() {
    let server = MockServer::start().await;
    let client = setup_client(&server.uri());

    Mock::given(method("GET"))
        .and(path("/item"))
        .and(query_param("search", "desk lamp"))
        .and(query_param("sortBy", "price"))
        .and(query_param("sortOrder", "DESC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let query = ItemQuery::new()
        .search("desk lamp")
        .sort_by(SortField::Price, SortOrder::Desc);
    let items = client.list(&query).await.unwrap();
    assert!(items.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.query(),
        Some("search=desk+lamp&sortBy=price&sortOrder=DESC")
    );
}

#[tokio::test]
async fn test_list_omits_sort_order_without_sort_by() {
    let server = MockServer::start().await;
    let client = setup_client(&server.uri());

    Mock::given(method("GET"))
        .and(path("/item"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let query = ItemQuery {
        search: Some("mug".to_string()),
        sort_by: None,
        sort_order: Some(SortOrder::Desc),
    };
    client.list(&query).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("search=mug"));
}

#[tokio::test]
async fn test_get_item() {
    let server = MockServer::start().await;
    let client = setup_client(&server.uri());

    Mock::given(method("GET"))
        .and(path("/item/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "name": "Chair", "type": "furniture", "category": "office", "price": 49.99
        })))
        .mount(&server)
        .await;

    let item = client.get(7).await.unwrap();
    assert_eq!(item.id, 7);
    assert_eq!(item.item_type, "furniture");
    assert_eq!(item.price, 49.99);
    assert_eq!(item.image_url, None);
}

#[tokio::test]
async fn test_get_item_not_found() {
    let server = MockServer::start().await;
    let client = setup_client(&server.uri());

    Mock::given(method("GET"))
        .and(path("/item/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "statusCode": 404,
            "message": "Item with ID 404 not found",
            "error": "Not Found"
        })))
        .mount(&server)
        .await;

    let err = client.get(404).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.server_message(), Some("Item with ID 404 not found"));
}

#[tokio::test]
async fn test_get_item_unusable_body() {
    let server = MockServer::start().await;
    let client = setup_client(&server.uri());

    Mock::given(method("GET"))
        .and(path("/item/9"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let err = client.get(9).await.unwrap_err();
    assert!(matches!(err, ApiError::Json(_)));
}

#[tokio::test]
async fn test_create_item() {
    let server = MockServer::start().await;
    let client = setup_client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/item"))
        .and(body_json(json!({
            "name": "Lamp", "type": "lighting", "category": "home", "price": 19.5
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 42, "name": "Lamp", "type": "lighting", "category": "home", "price": 19.5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let item = client.create(&sample_fields()).await.unwrap();
    assert_eq!(item.id, 42);
}

#[tokio::test]
async fn test_create_item_validation_error() {
    let server = MockServer::start().await;
    let client = setup_client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/item"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "statusCode": 400,
            "message": ["price must not be less than 0"],
            "error": "Bad Request"
        })))
        .mount(&server)
        .await;

    let fields = ItemFields {
        price: Some(-1.0),
        ..sample_fields()
    };
    let err = client.create(&fields).await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
    assert_eq!(err.server_message(), Some("price must not be less than 0"));
}

#[tokio::test]
async fn test_update_item() {
    let server = MockServer::start().await;
    let client = setup_client(&server.uri());

    Mock::given(method("PATCH"))
        .and(path("/item/5"))
        .and(body_json(json!({
            "name": "X", "type": "T", "category": "C", "price": 9.99
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "name": "X", "type": "T", "category": "C", "price": 9.99
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fields = ItemFields {
        name: "X".to_string(),
        item_type: "T".to_string(),
        category: "C".to_string(),
        price: Some(9.99),
    };
    let item = client.update(5, &fields).await.unwrap();
    assert_eq!(item.name, "X");
}

#[tokio::test]
async fn test_delete_item() {
    let server = MockServer::start().await;
    let client = setup_client(&server.uri());

    Mock::given(method("DELETE"))
        .and(path("/item/3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.delete(3).await.unwrap();
}

#[tokio::test]
async fn test_delete_item_server_error() {
    let server = MockServer::start().await;
    let client = setup_client(&server.uri());

    Mock::given(method("DELETE"))
        .and(path("/item/3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = client.delete(3).await.unwrap_err();
    assert_eq!(err.server_message(), None);
    assert!(matches!(err, ApiError::Api { .. }));
}

#[tokio::test]
async fn test_upload_image_multipart() {
    let server = MockServer::start().await;
    let client = setup_client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/upload/42/image"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "imageUrl": "/uploads/photo.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = Attachment::new("photo.png", b"PNGDATA".to_vec()).with_content_type("image/png");
    client.upload_image(42, &file).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("Content-Disposition: form-data; name=\"file\""));
    assert!(body.contains("filename=\"photo.png\""));
    assert!(body.contains("Content-Type: image/png"));
    assert!(body.contains("PNGDATA"));
}

#[tokio::test]
async fn test_attachment_from_path() {
    let mut tmp = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    tmp.write_all(b"jpeg bytes").unwrap();

    let file = Attachment::from_path(tmp.path()).await.unwrap();
    assert_eq!(file.data, b"jpeg bytes".to_vec());
    assert!(file.file_name.ends_with(".jpg"));
    assert_eq!(file.content_type.as_deref(), Some("image/jpeg"));
}

#[tokio::test]
async fn test_attachment_from_path_unknown_extension() {
    let mut tmp = tempfile::Builder::new().suffix(".zzq").tempfile().unwrap();
    tmp.write_all(b"???").unwrap();

    let file = Attachment::from_path(tmp.path()).await.unwrap();
    assert_eq!(file.content_type.as_deref(), Some("application/octet-stream"));
}

#[tokio::test]
async fn test_upload_image_from_path_sends_guessed_type() {
    let server = MockServer::start().await;
    let client = setup_client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/upload/7/image"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "imageUrl": "/uploads/photo.jpg"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut tmp = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    tmp.write_all(b"JPEGDATA").unwrap();
    let file = Attachment::from_path(tmp.path()).await.unwrap();
    client.upload_image(7, &file).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("Content-Type: image/jpeg"));
    assert!(body.contains("JPEGDATA"));
}

#[tokio::test]
async fn test_attachment_from_missing_path() {
    let err = Attachment::from_path(std::path::Path::new("/nonexistent/photo.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Io(_)));
}

#[tokio::test]
async fn test_transport_failure() {
    // Nothing listens on port 9 of localhost
    let client = setup_client("http://127.0.0.1:9");
    let err = client.list(&ItemQuery::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[test]
fn test_invalid_base_url() {
    let err = ItemClient::new("not a url", reqwest::Client::new()).unwrap_err();
    assert!(matches!(err, ApiError::Url(_)));
}

#[test]
fn test_base_url_trailing_slash_trimmed() {
    let client = setup_client("http://localhost:3000/");
    assert_eq!(client.base_url(), "http://localhost:3000");
}
