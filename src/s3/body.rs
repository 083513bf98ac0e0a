//! 对象内容模块
//!
//! 请求带有 `Content-Length` 时，请求体边读边写入存储；否则先读入内存。

use aws_sdk_s3::primitives::ByteStream;
use axum::body::{Body, Bytes};
use http_body::Frame;
use http_body_util::{BodyExt, StreamBody};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// 转发通道中缓冲的数据帧数量
const FORWARD_BUFFER_FRAMES: usize = 8;

/// 要写入存储的对象内容
#[derive(Debug)]
pub enum ObjectBody {
    /// 长度已知，直接转发请求体
    Streaming { body: Body, content_length: u64 },
    /// 长度未知时读入内存的内容
    Buffered(Bytes),
}

impl ObjectBody {
    /// 对象的字节数
    pub fn content_length(&self) -> u64 {
        match self {
            ObjectBody::Streaming { content_length, .. } => *content_length,
            ObjectBody::Buffered(bytes) => bytes.len() as u64,
        }
    }

    /// 读出全部内容
    pub async fn into_bytes(self) -> Result<Bytes, axum::Error> {
        match self {
            ObjectBody::Streaming { body, .. } => axum::body::to_bytes(body, usize::MAX).await,
            ObjectBody::Buffered(bytes) => Ok(bytes),
        }
    }

    /// 转换为 S3 SDK 使用的字节流
    pub fn into_byte_stream(self) -> ByteStream {
        match self {
            ObjectBody::Streaming { body, .. } => ByteStream::from_body_1_x(forward_body(body)),
            ObjectBody::Buffered(bytes) => ByteStream::from(bytes),
        }
    }
}

impl From<Bytes> for ObjectBody {
    fn from(bytes: Bytes) -> Self {
        ObjectBody::Buffered(bytes)
    }
}

type ForwardedFrame = Result<Frame<Bytes>, axum::Error>;

/// 把请求体转发到一个可跨线程共享的新 body。
///
/// SDK 要求 body 同时实现 `Send` 和 `Sync`，而 axum 的 `Body` 不是 `Sync`，
/// 因此由后台任务逐帧读取请求体并通过有界通道发送。接收端被丢弃时任务随之结束。
fn forward_body(mut body: Body) -> StreamBody<ReceiverStream<ForwardedFrame>> {
    let (tx, rx) = mpsc::channel::<ForwardedFrame>(FORWARD_BUFFER_FRAMES);

    tokio::spawn(async move {
        while let Some(frame) = body.frame().await {
            let failed = frame.is_err();
            if tx.send(frame).await.is_err() || failed {
                break;
            }
        }
    });

    StreamBody::new(ReceiverStream::new(rx))
}
