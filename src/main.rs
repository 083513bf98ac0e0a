use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;
use upload_server::config::ServerConfig;
use upload_server::{AppState, app, init_storage};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env 文件
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_timer(LocalTime::rfc_3339())
        .init();

    // 配置不完整时在监听端口之前退出
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            for issue in &err.issues {
                error!("{}", issue);
                info!("{}", issue.hint());
            }
            process::exit(1);
        }
    };

    let store = init_storage(&config)
        .await
        .context("初始化对象存储失败")?;
    let state = AppState::new(store, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("无法监听 {}", addr))?;

    info!("服务器运行在 http://{}", addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
