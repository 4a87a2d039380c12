//! V2：扩展资料、分页过滤、部分更新、批量操作

pub mod handler;
pub mod model;
pub mod service;

use axum::{
    routing::{get, post},
    Router,
};

use super::{root, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/health",
            get(handler::health)
                .post(handler::health)
                .fallback(root::not_found),
        )
        .route(
            "/users",
            get(handler::list_users)
                .post(handler::create_user)
                .fallback(root::not_found),
        )
        .route(
            "/users/batch",
            post(handler::batch)
                .get(handler::get_batch_user)
                .put(handler::update_batch_user)
                .delete(handler::delete_batch_user)
                .fallback(root::not_found),
        )
        .route(
            "/users/:id",
            get(handler::get_user)
                .put(handler::update_user)
                .delete(handler::delete_user)
                .fallback(root::not_found),
        )
}
