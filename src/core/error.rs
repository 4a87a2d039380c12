//! 核心错误处理模块

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::any::Any;

use super::validation::ValidationIssue;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// 请求体未通过校验，返回 400
    #[error("request validation failed")]
    Validation(Vec<ValidationIssue>),
    /// 自带状态码和响应体的 HTTP 异常，原样透传
    #[error("http exception {status}")]
    Http { status: StatusCode, body: Value },
    /// 其余所有错误，统一为 500
    #[error("{}", .0.message)]
    Unhandled(UnhandledError),
}

/// 未处理错误的描述，挂在响应扩展上供错误中间件渲染
#[derive(Debug, Clone)]
pub struct UnhandledError {
    pub kind: String,
    pub message: String,
    pub details: String,
}

/// 校验失败响应结构
#[derive(Serialize)]
pub struct ValidationErrorResponse {
    pub success: bool,
    pub error: ValidationErrorBody,
}

#[derive(Serialize)]
pub struct ValidationErrorBody {
    pub name: &'static str,
    pub issues: Vec<ValidationIssue>,
}

/// 500 错误响应结构
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CoreError {
    pub fn http(status: StatusCode, body: Value) -> Self {
        CoreError::Http { status, body }
    }

    /// 由 panic 负载构造未处理错误
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Internal Server Error".to_string()
        };

        CoreError::Unhandled(UnhandledError {
            kind: "Panic".to_string(),
            details: format!("Panic: {}", message),
            message,
        })
    }
}

impl UnhandledError {
    /// 渲染 500 响应体，`with_details` 决定是否附带调试细节
    pub fn render(&self, with_details: bool) -> Response {
        let body = ErrorResponse {
            success: false,
            message: if self.message.is_empty() {
                "Internal Server Error".to_string()
            } else {
                self.message.clone()
            },
            error: ErrorDetail {
                kind: self.kind.clone(),
                details: with_details.then(|| self.details.clone()),
            },
        };

        let mut response = (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        response.extensions_mut().insert(self.clone());
        response
    }
}

impl From<anyhow::Error> for CoreError {
    fn from(err: anyhow::Error) -> Self {
        CoreError::Unhandled(UnhandledError {
            kind: "Error".to_string(),
            message: err.to_string(),
            details: format!("Error: {:?}", err),
        })
    }
}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        let code = match &rejection {
            JsonRejection::JsonDataError(_) => "invalid_type",
            JsonRejection::JsonSyntaxError(_) => "invalid_json",
            JsonRejection::MissingJsonContentType(_) => "invalid_content_type",
            _ => "invalid_body",
        };

        CoreError::Validation(vec![ValidationIssue {
            code: code.to_string(),
            path: Vec::new(),
            message: rejection.body_text(),
        }])
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(ValidationIssue::flatten(&errors))
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        match self {
            CoreError::Validation(issues) => {
                let body = ValidationErrorResponse {
                    success: false,
                    error: ValidationErrorBody {
                        name: "ValidationError",
                        issues,
                    },
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            CoreError::Http { status, body } => (status, Json(body)).into_response(),
            // 默认不带细节；开发模式下由 unhandled_error_middleware 重新渲染
            CoreError::Unhandled(err) => err.render(false),
        }
    }
}

/// 404 响应体
pub fn not_found_body(path: &str) -> Value {
    json!({
        "success": false,
        "message": "Not Found",
        "path": path,
    })
}
