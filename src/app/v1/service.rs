//! V1 业务服务

use std::sync::Arc;

use super::model::{DeleteConfirmation, User, UserPayload};
use crate::core::service::IdGenerator;

#[derive(Clone)]
pub struct UserService {
    ids: Arc<dyn IdGenerator>,
}

impl UserService {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    pub fn list_users(&self) -> Vec<User> {
        vec![
            User {
                id: Some(1),
                name: "John Doe".to_string(),
                email: "john@example.com".to_string(),
                age: None,
            },
            User {
                id: Some(2),
                name: "Jane Smith".to_string(),
                email: "jane@example.com".to_string(),
                age: None,
            },
        ]
    }

    /// 不检查是否存在，始终返回回显 id 的模拟用户
    pub fn get_user(&self, id: Option<i64>) -> User {
        User {
            id,
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            age: None,
        }
    }

    pub fn create_user(&self, payload: UserPayload) -> User {
        User {
            id: Some(self.ids.next_id()),
            name: payload.name,
            email: payload.email,
            age: payload.age,
        }
    }

    pub fn update_user(&self, id: Option<i64>, payload: UserPayload) -> User {
        User {
            id,
            name: payload.name,
            email: payload.email,
            age: payload.age,
        }
    }

    pub fn delete_user(&self, raw_id: &str) -> DeleteConfirmation {
        DeleteConfirmation {
            message: format!("User {} deleted successfully", raw_id),
        }
    }
}
