//! 核心层：错误处理、响应、中间件、校验

pub mod cors;
pub mod error;
pub mod middleware;
pub mod rate_limit;
pub mod response;
pub mod service;
pub mod validation;
