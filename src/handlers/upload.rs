use crate::AppState;
use crate::error::AppError;
use crate::s3::ObjectBody;
use crate::utils::key::random_key;
use crate::utils::path::object_url;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, header},
};
use tracing::debug;

/// 从请求头中读取请求体长度
fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// 处理文件上传请求
///
/// 将请求体原样写入存储桶中的随机键，不校验大小和类型。
/// 请求带有 `Content-Length` 时请求体直接流式写入存储，否则先读入内存。
///
/// # 参数
///
/// * `state` - 应用状态，包含对象存储和存储桶信息
/// * `headers` - 请求头，用于获取 `Content-Length`
/// * `body` - 请求体，即对象内容
///
/// # 返回值
///
/// * `Ok(String)` - 对象的公开 URL（纯文本）
/// * `Err(AppError)` - 读取请求体失败返回 400，写入存储失败返回 502
pub async fn handle_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Result<String, AppError> {
    let key = random_key();

    let body = match content_length(&headers) {
        Some(content_length) => ObjectBody::Streaming {
            body,
            content_length,
        },
        None => ObjectBody::Buffered(
            axum::body::to_bytes(body, usize::MAX)
                .await
                .map_err(AppError::ReadBody)?,
        ),
    };
    debug!(key = %key, size = body.content_length(), "上传对象");

    state.store.put_object(&state.bucket, &key, body).await?;

    Ok(object_url(&state.public_base_url, &state.bucket, &key))
}
