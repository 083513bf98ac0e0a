//! S3客户端模块
//!
//! 该模块负责根据配置创建 S3 客户端。

use crate::config::ServerConfig;
use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, RequestChecksumCalculation};

/// 凭据来源名称，只用于 SDK 的调试输出
const CREDENTIALS_PROVIDER_NAME: &str = "storage-env";

/// 使用服务器配置创建 S3 客户端。
///
/// MinIO 需要路径风格的寻址方式（`http://host:port/bucket/key`），
/// 因此始终开启 `force_path_style`。校验和只在操作要求时计算，
/// 这样流式上传的请求体按原始字节发送，不使用 aws-chunked 编码。
///
/// # 参数
///
/// * `config` - 服务器配置。
///
/// # 返回值
///
/// 配置好的 `aws_sdk_s3::Client`。
pub async fn create_s3_client(config: &ServerConfig) -> Client {
    let storage = &config.storage;

    let credentials = Credentials::new(
        storage.access_key.clone(),
        storage.secret_key.clone(),
        None,
        None,
        CREDENTIALS_PROVIDER_NAME,
    );

    let region_provider = RegionProviderChain::first_try(Some(Region::new(config.region.clone())));

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .credentials_provider(credentials)
        .region(region_provider)
        .endpoint_url(storage.endpoint_url())
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(true)
        .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
        .build();

    Client::from_conf(s3_config)
}
