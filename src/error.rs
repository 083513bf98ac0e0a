//! HTTP 错误映射模块

use crate::s3::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// 请求处理过程中的错误
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("读取请求体失败: {0}")]
    ReadBody(#[source] axum::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // 存储服务是上游，失败按网关错误返回
            AppError::Storage(err) => {
                error!("{}", err);
                (StatusCode::BAD_GATEWAY, err.to_string()).into_response()
            }
            AppError::ReadBody(err) => {
                let message = format!("读取请求体失败: {}", err);
                (StatusCode::BAD_REQUEST, message).into_response()
            }
        }
    }
}
