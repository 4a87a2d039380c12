//! 应用层：状态、版本路由挂载和全局中间件

pub mod root;
pub mod v1;
pub mod v2;

use axum::{
    extract::FromRef,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::{any::Any, sync::Arc};
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::core::{
    cors::cors_layer,
    error::CoreError,
    middleware::{
        preflight_status_middleware, pretty_json_middleware, rate_limit_middleware,
        request_logging_middleware, security_headers_middleware, unhandled_error_middleware,
    },
    rate_limit::RateLimiter,
    service::{IdGenerator, RandomIds},
};
use crate::infrastructure::system::SystemProbe;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub v1_users: v1::service::UserService,
    pub v2_users: v2::service::UserService,
    pub system: SystemProbe,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self::with_ids(config, Arc::new(RandomIds))
    }

    /// 指定 id 生成器，测试中用来固定生成的 id
    pub fn with_ids(config: AppConfig, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            config: Arc::new(config),
            v1_users: v1::service::UserService::new(ids.clone()),
            v2_users: v2::service::UserService::new(ids),
            system: SystemProbe::new(),
        }
    }
}

impl FromRef<AppState> for v1::service::UserService {
    fn from_ref(state: &AppState) -> Self {
        state.v1_users.clone()
    }
}

impl FromRef<AppState> for v2::service::UserService {
    fn from_ref(state: &AppState) -> Self {
        state.v2_users.clone()
    }
}

impl FromRef<AppState> for SystemProbe {
    fn from_ref(state: &AppState) -> Self {
        state.system.clone()
    }
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    CoreError::from_panic(payload).into_response()
}

/// 构建完整路由
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let routes = Router::new()
        // 方法不匹配时同样走 404，而不是空的 405
        .route("/", get(root::api_info).fallback(root::not_found))
        .route("/docs", get(root::docs).fallback(root::not_found))
        .route(
            "/test-error",
            get(root::test_error).fallback(root::not_found),
        )
        .nest("/v1", v1::router())
        .nest("/v2", v2::router())
        .fallback(root::not_found)
        .with_state(state);

    with_middleware(routes, config)
}

/// 全局中间件，由内到外依次包裹
pub fn with_middleware(routes: Router, config: Arc<AppConfig>) -> Router {
    let mut router = routes
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(
            config.clone(),
            unhandled_error_middleware,
        ))
        .layer(middleware::from_fn(pretty_json_middleware))
        .layer(TimeoutLayer::new(config.http.request_timeout));

    if config.rate_limit.enabled {
        router = router.layer(middleware::from_fn_with_state(
            RateLimiter::from_config(&config.rate_limit),
            rate_limit_middleware,
        ));
    }

    router
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(cors_layer(&config.cors_origins))
        .layer(middleware::from_fn(preflight_status_middleware))
}
