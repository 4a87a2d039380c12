//! V2 业务服务

use serde_json::{Map, Value};
use std::sync::Arc;

use super::model::{
    BatchOperation, BatchResult, CreateUserPayload, DeleteConfirmation, DeleteMetadata,
    ListQuery, Page, PageMetadata, Profile, Role, Settings, Theme, UpdateUserPayload, User,
    UserMetadata,
};
use crate::core::{
    response::{iso_timestamp, parse_id},
    service::IdGenerator,
};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct UserService {
    ids: Arc<dyn IdGenerator>,
}

impl UserService {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    fn dataset() -> Vec<User> {
        vec![
            User {
                id: Some(1),
                name: "John Doe".to_string(),
                email: "john@example.com".to_string(),
                profile: Some(Profile {
                    age: Some(30),
                    phone: Some("1234567890".to_string()),
                    address: None,
                }),
                role: Some(Role::Admin),
                settings: Some(Settings {
                    notifications: true,
                    theme: Theme::Dark,
                }),
                metadata: None,
            },
            User {
                id: Some(2),
                name: "Jane Smith".to_string(),
                email: "jane@example.com".to_string(),
                profile: Some(Profile {
                    age: Some(25),
                    phone: Some("0987654321".to_string()),
                    address: None,
                }),
                role: Some(Role::User),
                settings: Some(Settings {
                    notifications: false,
                    theme: Theme::Light,
                }),
                metadata: None,
            },
        ]
    }

    /// 按角色过滤后分页，页码和条数不做边界检查
    pub fn list_users(&self, query: &ListQuery) -> Page<User> {
        let page = query.page.as_deref().and_then(parse_id).unwrap_or(DEFAULT_PAGE);
        let limit = query.limit.as_deref().and_then(parse_id).unwrap_or(DEFAULT_LIMIT);

        let users: Vec<User> = match query.role.as_deref().filter(|r| !r.is_empty()) {
            Some(role) => Self::dataset()
                .into_iter()
                .filter(|user| user.role.map(Role::as_str) == Some(role))
                .collect(),
            None => Self::dataset(),
        };

        paginate(users, page, limit)
    }

    pub fn get_user(&self, id: Option<i64>) -> User {
        let now = iso_timestamp();
        User {
            id,
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            profile: Some(Profile {
                age: Some(30),
                phone: Some("1234567890".to_string()),
                address: Some("123 Main St".to_string()),
            }),
            role: Some(Role::Admin),
            settings: Some(Settings {
                notifications: true,
                theme: Theme::Dark,
            }),
            metadata: Some(UserMetadata {
                created_at: Some(now.clone()),
                last_login: Some(now),
                updated_at: None,
            }),
        }
    }

    pub fn create_user(&self, payload: CreateUserPayload) -> User {
        let now = iso_timestamp();
        User {
            id: Some(self.ids.next_id()),
            name: payload.name,
            email: payload.email,
            profile: Some(payload.profile),
            role: Some(payload.role),
            settings: payload.settings,
            metadata: Some(UserMetadata {
                created_at: Some(now.clone()),
                last_login: Some(now),
                updated_at: None,
            }),
        }
    }

    /// 把提交的字段合并到固定的基础用户上
    pub fn update_user(&self, id: Option<i64>, updates: UpdateUserPayload) -> User {
        User {
            id,
            name: updates.name.unwrap_or_else(|| "John Doe".to_string()),
            email: updates.email.unwrap_or_else(|| "john@example.com".to_string()),
            profile: updates.profile,
            role: updates.role,
            settings: updates.settings,
            metadata: Some(UserMetadata {
                updated_at: Some(iso_timestamp()),
                ..UserMetadata::default()
            }),
        }
    }

    pub fn delete_user(&self, raw_id: &str) -> DeleteConfirmation {
        DeleteConfirmation {
            success: true,
            message: format!("User {} deleted successfully", raw_id),
            metadata: DeleteMetadata {
                deleted_at: iso_timestamp(),
            },
        }
    }

    /// 每个操作独立回显为成功，不做用户校验，也不互相影响
    pub fn batch(&self, operations: Vec<BatchOperation>) -> Vec<BatchResult> {
        operations
            .into_iter()
            .map(|op| {
                let id = op.id.unwrap_or_else(|| self.ids.next_id());
                let mut data = Map::new();
                data.insert("id".to_string(), Value::from(id));
                // data 中的字段在 id 之后合并，同名字段覆盖 id
                if let Value::Object(fields) = op.data {
                    data.extend(fields);
                }

                BatchResult {
                    action: op.action,
                    success: true,
                    data,
                }
            })
            .collect()
    }
}

/// 按 `(page-1)*limit` 起始切片；负数边界从末尾倒数，与数组 slice 语义一致
pub fn paginate<T>(items: Vec<T>, page: i64, limit: i64) -> Page<T> {
    let total = items.len();
    let start = page.saturating_sub(1).saturating_mul(limit);
    let end = start.saturating_add(limit);
    let (from, to) = slice_bounds(total, start, end);

    let pages = (limit != 0).then(|| (total as f64 / limit as f64).ceil() as i64);
    let data = items.into_iter().skip(from).take(to - from).collect();

    Page {
        data,
        metadata: PageMetadata {
            total,
            page,
            limit,
            pages,
        },
    }
}

fn slice_bounds(len: usize, start: i64, end: i64) -> (usize, usize) {
    let resolve = |index: i64| -> usize {
        if index < 0 {
            (len as i64).saturating_add(index).max(0) as usize
        } else {
            (index as u64).min(len as u64) as usize
        }
    };
    let from = resolve(start);
    let to = resolve(end);
    (from, to.max(from))
}
