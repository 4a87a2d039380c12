//! 核心中间件模块

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};
use std::{sync::Arc, time::Instant};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    error::{CoreError, UnhandledError},
    rate_limit::RateLimiter,
};
use crate::config::AppConfig;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("x-xss-protection", "0"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-permitted-cross-domain-policies", "none"),
    ("cross-origin-resource-policy", "same-origin"),
    ("cross-origin-opener-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
];

/// 请求日志中间件
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let request_id = Uuid::new_v4().to_string();

    let mut response = next.run(req).await;
    let status = response.status();
    let duration = start.elapsed();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }

    info!(
        "{} {} - {} - {}ms - User-Agent: {:?} - Request-Id: {}",
        method,
        uri,
        status,
        duration.as_millis(),
        user_agent,
        request_id
    );

    response
}

/// 安全响应头，已存在的头不覆盖
pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    for &(name, value) in SECURITY_HEADERS {
        headers
            .entry(HeaderName::from_static(name))
            .or_insert(HeaderValue::from_static(value));
    }
    response
}

/// tower-http 直接以 200 应答所有 OPTIONS 请求，这里统一改为 204
pub async fn preflight_status_middleware(req: Request, next: Next) -> Response {
    let is_preflight = req.method() == Method::OPTIONS;

    let mut response = next.run(req).await;
    if is_preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

/// 请求带 `pretty` 查询参数时格式化 JSON 响应
pub async fn pretty_json_middleware(req: Request, next: Next) -> Response {
    let wants_pretty = req
        .uri()
        .query()
        .map(|query| {
            query
                .split('&')
                .any(|pair| pair.split('=').next() == Some("pretty"))
        })
        .unwrap_or(false);

    let response = next.run(req).await;
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false);

    if !wants_pretty || !is_json {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("Failed to buffer response body: {}", err);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let pretty = serde_json::from_slice::<Value>(&bytes)
        .ok()
        .and_then(|value| serde_json::to_vec_pretty(&value).ok());
    let body = match pretty {
        Some(pretty) => Body::from(pretty),
        None => Body::from(bytes),
    };

    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, body)
}

/// 全局错误处理：记录未处理错误，开发模式下附带错误细节
pub async fn unhandled_error_middleware(
    State(config): State<Arc<AppConfig>>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let Some(err) = response.extensions().get::<UnhandledError>().cloned() else {
        return response;
    };

    error!(
        "Unhandled error: {} {} - {}: {}",
        method,
        path,
        err.kind,
        err.details
    );

    if config.mode.is_development() {
        err.render(true)
    } else {
        response
    }
}

/// 限流中间件，按 `x-forwarded-for` 区分客户端
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Result<Response, CoreError> {
    let client = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    if !limiter.check(&client) {
        warn!("Rate limit exceeded for client: {}", client);
        return Err(CoreError::http(
            StatusCode::TOO_MANY_REQUESTS,
            json!({
                "success": false,
                "message": "Too many requests",
            }),
        ));
    }

    Ok(next.run(req).await)
}
