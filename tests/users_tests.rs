use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use versioned_api::{build_router, core::service::SequentialIds, AppConfig, AppState};

fn app() -> Router {
    build_router(AppState::with_ids(
        AppConfig::default(),
        Arc::new(SequentialIds::starting_at(100)),
    ))
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app().oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

fn is_iso_timestamp(value: &Value) -> bool {
    value
        .as_str()
        .map(|s| s.ends_with('Z') && chrono::DateTime::parse_from_rfc3339(s).is_ok())
        .unwrap_or(false)
}

// ---------- v1 ----------

#[tokio::test]
async fn v1_health() {
    let (status, _, body) = send(request(Method::GET, "/v1/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], "v1");
    assert!(is_iso_timestamp(&body["timestamp"]));
}

#[tokio::test]
async fn v1_list_users() {
    let (status, _, body) = send(request(Method::GET, "/v1/users", None)).await;

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["id"], 1);
    assert!(data[0]["name"].is_string());
    assert!(data[0]["email"].is_string());
}

#[tokio::test]
async fn v1_get_user_echoes_id() {
    let (status, _, body) = send(request(Method::GET, "/v1/users/1", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["name"], "John Doe");
    assert_eq!(body["data"]["email"], "john@example.com");
}

#[tokio::test]
async fn v1_get_user_with_non_numeric_id_still_succeeds() {
    let (status, _, body) = send(request(Method::GET, "/v1/users/abc", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["id"].is_null());
}

#[tokio::test]
async fn v1_create_valid_user() {
    let payload = json!({"name": "Test User", "email": "test@example.com", "age": 25});
    let (status, _, body) = send(request(Method::POST, "/v1/users", Some(payload))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], 100);
    assert_eq!(body["data"]["name"], "Test User");
    assert_eq!(body["data"]["email"], "test@example.com");
    assert_eq!(body["data"]["age"], 25);
}

#[tokio::test]
async fn v1_create_without_age() {
    let payload = json!({"name": "Al", "email": "al@example.com"});
    let (status, _, body) = send(request(Method::POST, "/v1/users", Some(payload))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["id"].is_i64());
    assert!(body["data"].get("age").is_none());
}

#[tokio::test]
async fn v1_create_invalid_user() {
    let payload = json!({"name": "a", "email": "invalid-email"});
    let (status, _, body) = send(request(Method::POST, "/v1/users", Some(payload))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let issues = body["error"]["issues"].as_array().unwrap();
    let paths: Vec<&Value> = issues.iter().map(|i| &i["path"][0]).collect();
    assert!(paths.contains(&&json!("name")));
    assert!(paths.contains(&&json!("email")));
}

#[tokio::test]
async fn v1_create_negative_age_is_rejected() {
    let payload = json!({"name": "Test User", "email": "test@example.com", "age": -1});
    let (status, _, _) = send(request(Method::POST, "/v1/users", Some(payload))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn v1_create_malformed_json_is_bad_request() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/v1/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _, body) = send(req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["issues"][0]["code"], "invalid_json");
}

#[tokio::test]
async fn v1_update_user() {
    let payload = json!({"name": "Updated User", "email": "updated@example.com", "age": 30});
    let (status, _, body) = send(request(Method::PUT, "/v1/users/1", Some(payload))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["name"], "Updated User");
    assert_eq!(body["data"]["email"], "updated@example.com");
    assert_eq!(body["data"]["age"], 30);
}

#[tokio::test]
async fn v1_update_requires_full_payload() {
    // v1 更新使用完整校验，只给 name 也会失败
    let payload = json!({"name": "Only Name"});
    let (status, _, _) = send(request(Method::PUT, "/v1/users/1", Some(payload))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn v1_update_invalid_user() {
    let payload = json!({"name": "a", "email": "invalid-email"});
    let (status, _, _) = send(request(Method::PUT, "/v1/users/1", Some(payload))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn v1_delete_user() {
    let (status, _, body) = send(request(Method::DELETE, "/v1/users/1", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User 1 deleted successfully");

    // 删除不影响后续读取
    let (status, _, body) = send(request(Method::GET, "/v1/users/1", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 1);
}

// ---------- v2 ----------

#[tokio::test]
async fn v2_health_includes_system_metrics() {
    let (status, _, body) = send(request(Method::GET, "/v2/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], "v2");
    assert!(is_iso_timestamp(&body["timestamp"]));
    assert!(body["system"]["uptime"].as_f64().unwrap() >= 0.0);
    for key in ["heapTotal", "heapUsed", "rss"] {
        assert!(body["system"]["memory"][key].is_u64(), "missing {}", key);
    }
}

#[tokio::test]
async fn v2_list_paginates() {
    let (status, headers, body) =
        send(request(Method::GET, "/v2/users?page=1&limit=10", None)).await;

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    for key in ["id", "name", "email", "profile", "role", "settings"] {
        assert!(data[0].get(key).is_some(), "missing {}", key);
    }
    assert_eq!(
        body["metadata"],
        json!({"total": 2, "page": 1, "limit": 10, "pages": 1})
    );
    assert_eq!(headers["x-total-count"], "2");
    assert_eq!(headers["x-total-pages"], "1");
}

#[tokio::test]
async fn v2_list_filters_by_role() {
    let (status, _, body) = send(request(Method::GET, "/v2/users?role=admin", None)).await;

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert!(!data.is_empty());
    assert!(data.iter().all(|user| user["role"] == "admin"));
}

#[tokio::test]
async fn v2_list_accepts_unbounded_paging() {
    let (status, _, body) = send(request(Method::GET, "/v2/users?page=0&limit=0", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["metadata"]["page"], 0);
    assert_eq!(body["metadata"]["limit"], 0);
    assert!(body["metadata"]["pages"].is_null());
}

#[tokio::test]
async fn v2_get_extended_user() {
    let (status, _, body) = send(request(Method::GET, "/v2/users/1", None)).await;
    let data = &body["data"];

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["id"], 1);
    for key in ["age", "phone", "address"] {
        assert!(data["profile"].get(key).is_some(), "missing profile.{}", key);
    }
    assert!(data["settings"]["notifications"].is_boolean());
    assert!(data["settings"]["theme"].is_string());
    assert!(is_iso_timestamp(&data["metadata"]["createdAt"]));
    assert!(is_iso_timestamp(&data["metadata"]["lastLogin"]));
}

#[tokio::test]
async fn v2_create_valid_user() {
    let payload = json!({
        "name": "Test User",
        "email": "test@example.com",
        "profile": {"age": 25, "phone": "1234567890", "address": "123 Test St"},
        "role": "user",
        "settings": {"notifications": true, "theme": "light"}
    });
    let (status, _, body) = send(request(Method::POST, "/v2/users", Some(payload))).await;
    let data = &body["data"];

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(data["id"], 100);
    assert_eq!(data["name"], "Test User");
    assert_eq!(data["email"], "test@example.com");
    assert_eq!(data["profile"]["address"], "123 Test St");
    assert_eq!(data["role"], "user");
    assert_eq!(data["settings"]["theme"], "light");
    assert!(is_iso_timestamp(&data["metadata"]["createdAt"]));
    assert!(is_iso_timestamp(&data["metadata"]["lastLogin"]));
}

#[tokio::test]
async fn v2_create_applies_defaults() {
    let payload = json!({
        "name": "Defaults",
        "email": "defaults@example.com",
        "profile": {},
        "settings": {}
    });
    let (status, _, body) = send(request(Method::POST, "/v2/users", Some(payload))).await;
    let data = &body["data"];

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(data["role"], "user");
    assert_eq!(data["settings"], json!({"notifications": true, "theme": "light"}));
    assert_eq!(data["profile"], json!({}));
}

#[tokio::test]
async fn v2_create_requires_profile() {
    let payload = json!({"name": "No Profile", "email": "np@example.com"});
    let (status, _, _) = send(request(Method::POST, "/v2/users", Some(payload))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn v2_create_invalid_user() {
    let payload = json!({
        "name": "a",
        "email": "invalid-email",
        "profile": {"age": -1}
    });
    let (status, _, body) = send(request(Method::POST, "/v2/users", Some(payload))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let issues = body["error"]["issues"].as_array().unwrap();
    assert!(issues
        .iter()
        .any(|issue| issue["path"] == json!(["profile", "age"])));
}

#[tokio::test]
async fn v2_create_rejects_unknown_role() {
    let payload = json!({
        "name": "Role",
        "email": "role@example.com",
        "profile": {},
        "role": "superuser"
    });
    let (status, _, _) = send(request(Method::POST, "/v2/users", Some(payload))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn v2_partial_update() {
    let payload = json!({
        "name": "Updated User",
        "profile": {"age": 30},
        "settings": {"theme": "dark"}
    });
    let (status, _, body) = send(request(Method::PUT, "/v2/users/1", Some(payload))).await;
    let data = &body["data"];

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["id"], 1);
    assert_eq!(data["name"], "Updated User");
    assert_eq!(data["email"], "john@example.com");
    assert_eq!(data["profile"]["age"], 30);
    assert_eq!(data["settings"]["theme"], "dark");
    assert_eq!(data["settings"]["notifications"], true);
    assert!(is_iso_timestamp(&data["metadata"]["updatedAt"]));
}

#[tokio::test]
async fn v2_empty_update_is_valid() {
    // v2 更新为部分校验，空请求体也合法
    let (status, _, body) = send(request(Method::PUT, "/v2/users/1", Some(json!({})))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "John Doe");
}

#[tokio::test]
async fn v2_invalid_update() {
    let payload = json!({"name": "a", "profile": {"age": -1}});
    let (status, _, _) = send(request(Method::PUT, "/v2/users/1", Some(payload))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn v2_delete_user() {
    let (status, _, body) = send(request(Method::DELETE, "/v2/users/1", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User 1 deleted successfully");
    assert!(is_iso_timestamp(&body["metadata"]["deletedAt"]));
}

#[tokio::test]
async fn v2_batch_operations() {
    let payload = json!({
        "operations": [
            {"action": "create", "data": {"name": "New User", "email": "new@example.com", "profile": {"age": 25}}},
            {"action": "update", "id": 1, "data": {"name": "Updated Name"}},
            {"action": "delete", "id": 2}
        ]
    });
    let (status, _, body) = send(request(Method::POST, "/v2/users/batch", Some(payload))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    for (result, action) in results.iter().zip(["create", "update", "delete"]) {
        assert_eq!(result["action"], action);
        assert_eq!(result["success"], true);
        assert!(result["data"].is_object());
    }
    assert_eq!(results[0]["data"]["id"], 100);
    assert_eq!(results[0]["data"]["name"], "New User");
    assert_eq!(results[1]["data"]["id"], 1);
    assert_eq!(results[2]["data"], json!({"id": 2}));
}

#[tokio::test]
async fn v2_batch_rejects_invalid_action() {
    let payload = json!({
        "operations": [
            {"action": "create", "data": {}},
            {"action": "invalid", "data": {}}
        ]
    });
    let (status, _, body) = send(request(Method::POST, "/v2/users/batch", Some(payload))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn v2_batch_requires_operations() {
    let (status, _, _) = send(request(Method::POST, "/v2/users/batch", Some(json!({})))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn v2_batch_segment_is_treated_as_id() {
    let (status, _, body) = send(request(Method::GET, "/v2/users/batch", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["id"].is_null());
    assert_eq!(body["data"]["name"], "John Doe");

    let (status, _, body) = send(request(Method::DELETE, "/v2/users/batch", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User batch deleted successfully");

    let update = json!({"name": "Renamed"});
    let (status, _, body) = send(request(Method::PUT, "/v2/users/batch", Some(update))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["id"].is_null());
    assert_eq!(body["data"]["name"], "Renamed");
}

#[tokio::test]
async fn unsupported_method_is_not_found() {
    for (method, uri) in [
        (Method::PATCH, "/v1/users"),
        (Method::PATCH, "/v1/users/1"),
        (Method::PATCH, "/v2/users/batch"),
        (Method::DELETE, "/v2/health"),
    ] {
        let (status, _, body) = send(request(method, uri, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"success": false, "message": "Not Found", "path": uri})
        );
    }
}
