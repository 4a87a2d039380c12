//! 根路由：API 信息、文档、测试错误、404

use axum::{
    extract::OriginalUri,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::core::error::{not_found_body, CoreError};

/// API 信息
pub async fn api_info() -> Json<Value> {
    Json(json!({
        "name": "Versioned API",
        "description": "A versioned REST API example",
        "versions": {
            "v1": {
                "path": "/v1",
                "status": "stable",
                "features": ["Basic CRUD operations", "Simple validation"]
            },
            "v2": {
                "path": "/v2",
                "status": "latest",
                "features": [
                    "Enhanced validation",
                    "Extended user profiles",
                    "Pagination and search",
                    "Batch operations",
                    "Detailed responses"
                ]
            }
        },
        "documentation": "/docs"
    }))
}

fn endpoint(method: &str, path: &str, description: &str) -> Value {
    json!({
        "method": method,
        "path": path,
        "description": description,
    })
}

/// 各版本端点列表
pub async fn docs() -> Json<Value> {
    Json(json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Versioned API",
            "version": "2.0.0",
            "description": "A versioned REST API built with axum"
        },
        "versions": {
            "v1": {
                "status": "stable",
                "endpoints": [
                    endpoint("GET", "/v1/health", "Basic health check"),
                    endpoint("GET", "/v1/users", "List users"),
                    endpoint("GET", "/v1/users/:id", "Get user by ID"),
                    endpoint("POST", "/v1/users", "Create user"),
                    endpoint("PUT", "/v1/users/:id", "Update user"),
                    endpoint("DELETE", "/v1/users/:id", "Delete user"),
                ]
            },
            "v2": {
                "status": "latest",
                "endpoints": [
                    endpoint("GET", "/v2/health", "Enhanced health check with metrics"),
                    endpoint("GET", "/v2/users", "List users with pagination and search"),
                    endpoint("GET", "/v2/users/:id", "Get user by ID with extended info"),
                    endpoint("POST", "/v2/users", "Create user with extended profile"),
                    endpoint("PUT", "/v2/users/:id", "Partial update user"),
                    endpoint("DELETE", "/v2/users/:id", "Delete user"),
                    endpoint("POST", "/v2/users/batch", "Batch operations"),
                ]
            }
        }
    }))
}

/// 始终失败，用于验证全局错误处理
pub async fn test_error() -> Result<Json<Value>, CoreError> {
    Err(anyhow::anyhow!("Test error").into())
}

pub async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(not_found_body(uri.path())))
}
