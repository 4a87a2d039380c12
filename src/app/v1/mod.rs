//! V1：基础 CRUD 和简单校验

pub mod handler;
pub mod model;
pub mod service;

use axum::{routing::get, Router};

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
            "/users/:id",
            get(handler::get_user)
                .put(handler::update_user)
                .delete(handler::delete_user)
                .fallback(root::not_found),
        )
}
