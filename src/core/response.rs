//! 核心响应处理模块

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// API 响应结构，所有资源都包在 `data` 里
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// 当前时间的 ISO-8601 字符串，毫秒精度，`Z` 结尾
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 宽松解析路径中的 id：允许前导空白和符号，取开头的连续数字，
/// 没有数字时返回 `None`（序列化为 `null`）
pub fn parse_id(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;

    Some(if negative { -value } else { value })
}
