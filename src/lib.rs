//! # 版本化 REST API
//!
//! 基于 Axum 的 v1/v2 版本化接口示例，包括：
//! - 内存模拟用户数据的 CRUD 和批量操作
//! - 健康检查、API 信息与文档端点
//! - 请求体校验、CORS、安全响应头、统一错误处理

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{build_router, AppState};
pub use config::AppConfig;
