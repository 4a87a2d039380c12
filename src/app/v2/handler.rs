//! V2 处理器

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::Json,
};

use super::{
    model::{
        BatchRequest, BatchResponse, CreateUserPayload, DeleteConfirmation, HealthStatus,
        ListQuery, Page, UpdateUserPayload, User,
    },
    service::UserService,
};
use crate::core::{
    cors::{X_TOTAL_COUNT, X_TOTAL_PAGES},
    response::{iso_timestamp, parse_id, DataResponse},
    validation::ValidatedJson,
};
use crate::infrastructure::system::SystemProbe;

pub async fn health(State(system): State<SystemProbe>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: "v2",
        timestamp: iso_timestamp(),
        system: system.snapshot(),
    })
}

/// 分页列表，同时通过 `X-Total-Count` / `X-Total-Pages` 返回总数
pub async fn list_users(
    State(users): State<UserService>,
    Query(query): Query<ListQuery>,
) -> (HeaderMap, Json<Page<User>>) {
    let page = users.list_users(&query);

    let mut headers = HeaderMap::new();
    headers.insert(X_TOTAL_COUNT, HeaderValue::from(page.metadata.total));
    if let Some(pages) = page.metadata.pages {
        headers.insert(X_TOTAL_PAGES, HeaderValue::from(pages));
    }

    (headers, Json(page))
}

pub async fn get_user(
    State(users): State<UserService>,
    Path(id): Path<String>,
) -> Json<DataResponse<User>> {
    Json(DataResponse::new(users.get_user(parse_id(&id))))
}

pub async fn create_user(
    State(users): State<UserService>,
    ValidatedJson(payload): ValidatedJson<CreateUserPayload>,
) -> (StatusCode, Json<DataResponse<User>>) {
    let user = users.create_user(payload);
    (StatusCode::CREATED, Json(DataResponse::new(user)))
}

pub async fn update_user(
    State(users): State<UserService>,
    Path(id): Path<String>,
    ValidatedJson(updates): ValidatedJson<UpdateUserPayload>,
) -> Json<DataResponse<User>> {
    Json(DataResponse::new(users.update_user(parse_id(&id), updates)))
}

pub async fn delete_user(
    State(users): State<UserService>,
    Path(id): Path<String>,
) -> Json<DeleteConfirmation> {
    Json(users.delete_user(&id))
}

/// `/users/batch` 是静态路由，会遮住 `/users/:id` 的其他方法，
/// 这里把 `batch` 当作普通 id 处理
const BATCH_SEGMENT: &str = "batch";

pub async fn get_batch_user(State(users): State<UserService>) -> Json<DataResponse<User>> {
    Json(DataResponse::new(users.get_user(parse_id(BATCH_SEGMENT))))
}

pub async fn update_batch_user(
    State(users): State<UserService>,
    ValidatedJson(updates): ValidatedJson<UpdateUserPayload>,
) -> Json<DataResponse<User>> {
    Json(DataResponse::new(
        users.update_user(parse_id(BATCH_SEGMENT), updates),
    ))
}

pub async fn delete_batch_user(State(users): State<UserService>) -> Json<DeleteConfirmation> {
    Json(users.delete_user(BATCH_SEGMENT))
}

pub async fn batch(
    State(users): State<UserService>,
    ValidatedJson(request): ValidatedJson<BatchRequest>,
) -> Json<BatchResponse> {
    Json(BatchResponse {
        success: true,
        data: users.batch(request.operations),
    })
}
