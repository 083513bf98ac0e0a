//! 文件上传服务器库
//!
//! 这是一个基于Axum的上传服务器，主要功能包括：
//! - 从环境变量读取 MinIO 存储配置，缺失时立即报告
//! - 启动时确保存储桶存在并允许公开读取
//! - 将上传的请求体写入存储桶并返回公开访问 URL

pub mod config;
pub mod error;
pub mod handlers;
pub mod s3;
pub mod utils;

use axum::routing::{get, post};
use config::ServerConfig;
use http::Method;
use s3::{ObjectStore, S3Store, StorageError, create_s3_client, ensure_bucket};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// 应用状态，在所有请求处理器之间共享
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObjectStore>,
    pub bucket: String,
    pub public_base_url: String,
}

impl AppState {
    pub fn new(store: Arc<dyn ObjectStore>, config: &ServerConfig) -> Self {
        Self {
            store,
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.clone(),
        }
    }
}

/// 连接对象存储并准备存储桶。
///
/// 存储桶不存在时会创建并设置公开读取策略。
///
/// # Returns
///
/// 可供请求处理器使用的对象存储
pub async fn init_storage(config: &ServerConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
    info!("正在连接 MinIO 存储 {}...", config.storage.endpoint_url());
    let client = Arc::new(create_s3_client(config).await);
    let store: Arc<dyn ObjectStore> = Arc::new(S3Store::new(client));
    info!("已连接");

    ensure_bucket(store.as_ref(), &config.bucket).await?;

    Ok(store)
}

/// 创建并配置Axum应用程序
///
/// 此函数设置了一个完整的HTTP服务器，包括：
/// - CORS配置，允许GET、POST和OPTIONS请求
/// - 请求追踪中间件
/// - 使用说明页和上传路由，上传的请求体不限制大小
///
/// # Returns
///
/// 返回配置好的Axum Router实例
pub fn app(state: AppState) -> axum::Router {
    // 配置 CORS
    let cors = CorsLayer::permissive()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::any());

    axum::Router::new()
        .route("/", get(handlers::handle_index))
        .route("/upload", post(handlers::handle_upload))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
