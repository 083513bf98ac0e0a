//! 对象存储操作模块
//!
//! 该模块定义了服务器依赖的对象存储操作，以及基于 `aws_sdk_s3` 的实现。

use crate::s3::body::ObjectBody;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use std::sync::Arc;

/// 对象存储操作失败
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("检查存储桶 {bucket} 是否存在失败: {message}")]
    BucketExists { bucket: String, message: String },
    #[error("创建存储桶 {bucket} 失败: {message}")]
    CreateBucket { bucket: String, message: String },
    #[error("设置存储桶 {bucket} 的策略失败: {message}")]
    SetBucketPolicy { bucket: String, message: String },
    #[error("上传对象 {bucket}/{key} 失败: {message}")]
    PutObject {
        bucket: String,
        key: String,
        message: String,
    },
}

/// 服务器用到的对象存储操作
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 检查存储桶是否存在
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StorageError>;

    /// 创建存储桶
    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError>;

    /// 为存储桶设置 JSON 格式的访问策略
    async fn set_bucket_policy(&self, bucket: &str, policy: &str) -> Result<(), StorageError>;

    /// 将内容写入存储桶中的指定键
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: ObjectBody,
    ) -> Result<(), StorageError>;
}

/// 基于 S3 客户端的对象存储
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Arc<Client>,
}

impl S3Store {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StorageError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                // HEAD 响应没有响应体，404 时 SDK 不一定能解析出 NotFound
                let not_found = err.as_service_error().is_some_and(|e| e.is_not_found())
                    || err
                        .raw_response()
                        .is_some_and(|response| response.status().as_u16() == 404);

                if not_found {
                    Ok(false)
                } else {
                    Err(StorageError::BucketExists {
                        bucket: bucket.to_string(),
                        message: DisplayErrorContext(&err).to_string(),
                    })
                }
            }
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        self.client
            .create_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|err| StorageError::CreateBucket {
                bucket: bucket.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            })?;

        Ok(())
    }

    async fn set_bucket_policy(&self, bucket: &str, policy: &str) -> Result<(), StorageError> {
        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy)
            .send()
            .await
            .map_err(|err| StorageError::SetBucketPolicy {
                bucket: bucket.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            })?;

        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: ObjectBody,
    ) -> Result<(), StorageError> {
        let content_length = i64::try_from(body.content_length()).unwrap_or(i64::MAX);

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_length(content_length)
            .body(body.into_byte_stream())
            .send()
            .await
            .map_err(|err| StorageError::PutObject {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerConfig, StorageConfig};
    use crate::s3::{create_s3_client, ensure_bucket};
    use axum::body::{Body, Bytes};
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{
        body_string_contains, method, path, path_regex, query_param, query_param_is_missing,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// 创建指向模拟 S3 服务的存储实例
    async fn store_for(server: &MockServer) -> S3Store {
        let address = server.address();
        let config = ServerConfig {
            storage: StorageConfig {
                endpoint: address.ip().to_string(),
                port: address.port(),
                access_key: "minio".to_string(),
                secret_key: "minio-secret".to_string(),
                use_ssl: false,
            },
            listen_port: 3000,
            bucket: "example-bucket".to_string(),
            public_base_url: "https://minio-example.zeabur.app".to_string(),
            region: "us-east-1".to_string(),
        };

        S3Store::new(Arc::new(create_s3_client(&config).await))
    }

    /// 模拟服务收到的 PUT 对象请求体
    async fn received_object(server: &MockServer, object_path: &str) -> Vec<u8> {
        server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .find(|request| request.method.as_str() == "PUT" && request.url.path() == object_path)
            .map(|request| request.body)
            .unwrap()
    }

    #[tokio::test]
    async fn test_bucket_exists_true_on_200() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path_regex(r"^/example-bucket/?$"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        assert!(store.bucket_exists("example-bucket").await.unwrap());
    }

    #[tokio::test]
    async fn test_bucket_exists_false_on_404() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path_regex(r"^/example-bucket/?$"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        assert!(!store.bucket_exists("example-bucket").await.unwrap());
    }

    #[tokio::test]
    async fn test_bucket_exists_error_on_403() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path_regex(r"^/example-bucket/?$"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let err = store.bucket_exists("example-bucket").await.unwrap_err();
        assert!(matches!(err, StorageError::BucketExists { .. }));
    }

    #[tokio::test]
    async fn test_create_bucket_sends_put_bucket() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/example-bucket/?$"))
            .and(query_param_is_missing("policy"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        assert_ok!(store.create_bucket("example-bucket").await);
    }

    #[tokio::test]
    async fn test_create_bucket_maps_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/example-bucket/?$"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let err = assert_err!(store.create_bucket("example-bucket").await);
        assert!(matches!(err, StorageError::CreateBucket { .. }));
    }

    #[tokio::test]
    async fn test_set_bucket_policy_sends_policy_document() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/example-bucket/?$"))
            .and(query_param("policy", ""))
            .and(body_string_contains("arn:aws:s3:::example-bucket/*"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let policy = crate::s3::public_read_policy("example-bucket");
        assert_ok!(store.set_bucket_policy("example-bucket", &policy).await);
    }

    #[tokio::test]
    async fn test_set_bucket_policy_maps_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/example-bucket/?$"))
            .and(query_param("policy", ""))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let err = assert_err!(store.set_bucket_policy("example-bucket", "{}").await);
        assert!(matches!(err, StorageError::SetBucketPolicy { .. }));
    }

    #[tokio::test]
    async fn test_ensure_bucket_on_empty_backend() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path_regex(r"^/example-bucket/?$"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/example-bucket/?$"))
            .and(query_param_is_missing("policy"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/example-bucket/?$"))
            .and(query_param("policy", ""))
            .and(body_string_contains("s3:GetObject"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        assert!(ensure_bucket(&store, "example-bucket").await.unwrap());
    }

    #[tokio::test]
    async fn test_put_object_buffered_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/example-bucket/abc123"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let body = ObjectBody::from(Bytes::from_static(b"Hello World\n"));
        assert_ok!(store.put_object("example-bucket", "abc123", body).await);

        assert_eq!(
            received_object(&server, "/example-bucket/abc123").await,
            b"Hello World\n"
        );
    }

    #[tokio::test]
    async fn test_put_object_streamed_body_arrives_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/example-bucket/stream1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let payload: Vec<u8> = (0..=255u8).cycle().take(256 * 1024).collect();
        let chunks: Vec<Result<Bytes, std::io::Error>> = payload
            .chunks(16 * 1024)
            .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
            .collect();
        let body = ObjectBody::Streaming {
            body: Body::from_stream(tokio_stream::iter(chunks)),
            content_length: payload.len() as u64,
        };

        let store = store_for(&server).await;
        assert_ok!(store.put_object("example-bucket", "stream1", body).await);

        assert_eq!(
            received_object(&server, "/example-bucket/stream1").await,
            payload
        );
    }

    #[tokio::test]
    async fn test_put_object_maps_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/example-bucket/abc123"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let body = ObjectBody::from(Bytes::from_static(b"Hello World\n"));
        let result = store.put_object("example-bucket", "abc123", body).await;
        let err = assert_err!(result);
        assert!(matches!(err, StorageError::PutObject { ref key, .. } if key == "abc123"));
    }
}
