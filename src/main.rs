use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use versioned_api::{build_router, infrastructure::logger::Logger, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    Logger::init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    let addr = config.listen_addr();
    info!(
        "Starting versioned API (mode: {:?}, cors: {:?})",
        config.mode, config.cors_origins
    );

    let app = build_router(AppState::new(config));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("🚀 API 服务器运行在 http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET    /                 - API 信息");
    info!("   GET    /docs             - API 文档");
    info!("   GET    /v1/health        - 健康检查");
    info!("   *      /v1/users[/:id]   - 用户 CRUD");
    info!("   GET    /v2/health        - 健康检查 (含进程指标)");
    info!("   *      /v2/users[/:id]   - 用户 CRUD (分页、部分更新)");
    info!("   POST   /v2/users/batch   - 批量操作");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("服务器已关闭");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("收到关闭信号，开始优雅退出");
}
