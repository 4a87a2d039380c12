//! 请求体校验
//!
//! `ValidatedJson<T>` 先按 serde 反序列化请求体（字段形状、枚举、默认值），
//! 再执行 `validator` 规则（长度、邮箱、范围、嵌套），两步都通过才会进入处理器。

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use super::error::CoreError;

/// 单条校验问题
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub code: String,
    pub path: Vec<String>,
    pub message: String,
}

impl ValidationIssue {
    /// 把嵌套的 `ValidationErrors` 展平成带路径的问题列表
    pub fn flatten(errors: &ValidationErrors) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        collect(errors, &mut Vec::new(), &mut issues);
        issues.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.code.cmp(&b.code)));
        issues
    }
}

fn collect(errors: &ValidationErrors, prefix: &mut Vec<String>, out: &mut Vec<ValidationIssue>) {
    for (field, kind) in errors.errors() {
        prefix.push(field.to_string());
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    out.push(ValidationIssue {
                        code: error.code.to_string(),
                        path: prefix.clone(),
                        message: error
                            .message
                            .as_ref()
                            .map(|msg| msg.to_string())
                            .unwrap_or_else(|| format!("Invalid value for {}", field)),
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, prefix, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    prefix.push(index.to_string());
                    collect(inner, prefix, out);
                    prefix.pop();
                }
            }
        }
        prefix.pop();
    }
}

/// 反序列化并校验 JSON 请求体的提取器
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = CoreError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
