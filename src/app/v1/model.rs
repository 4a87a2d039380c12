//! V1 数据模型

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    /// 路径中的 id 无法解析时为 `null`
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
}

/// 创建和更新共用的请求体，更新时同样要求完整字段
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserPayload {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(range(min = 0, message = "Age must be a non-negative number"))]
    pub age: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}
