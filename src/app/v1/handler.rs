//! V1 处理器

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use super::{
    model::{DeleteConfirmation, HealthStatus, User, UserPayload},
    service::UserService,
};
use crate::core::{
    response::{iso_timestamp, parse_id, DataResponse},
    validation::ValidatedJson,
};

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: "v1",
        timestamp: iso_timestamp(),
    })
}

pub async fn list_users(State(users): State<UserService>) -> Json<DataResponse<Vec<User>>> {
    Json(DataResponse::new(users.list_users()))
}

pub async fn get_user(
    State(users): State<UserService>,
    Path(id): Path<String>,
) -> Json<DataResponse<User>> {
    Json(DataResponse::new(users.get_user(parse_id(&id))))
}

pub async fn create_user(
    State(users): State<UserService>,
    ValidatedJson(payload): ValidatedJson<UserPayload>,
) -> (StatusCode, Json<DataResponse<User>>) {
    let user = users.create_user(payload);
    (StatusCode::CREATED, Json(DataResponse::new(user)))
}

pub async fn update_user(
    State(users): State<UserService>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UserPayload>,
) -> Json<DataResponse<User>> {
    Json(DataResponse::new(users.update_user(parse_id(&id), payload)))
}

pub async fn delete_user(
    State(users): State<UserService>,
    Path(id): Path<String>,
) -> Json<DeleteConfirmation> {
    Json(users.delete_user(&id))
}
