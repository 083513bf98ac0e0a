//! 存储桶初始化模块
//!
//! 启动时确保目标存储桶存在，并在新建时附加公开读取策略。

use crate::s3::store::{ObjectStore, StorageError};
use serde_json::json;
use tracing::info;

/// 策略语言版本
const POLICY_VERSION: &str = "2012-10-17";

/// 策略文档 ID
const POLICY_ID: &str = "allow-all-read";

/// 生成允许任何人读取存储桶内所有对象的策略文档。
///
/// # 参数
///
/// * `bucket` - 存储桶名称。
///
/// # 返回值
///
/// JSON 格式的策略文档。
pub fn public_read_policy(bucket: &str) -> String {
    json!({
        "Version": POLICY_VERSION,
        "Id": POLICY_ID,
        "Statement": [{
            "Action": ["s3:GetObject"],
            "Effect": "Allow",
            "Principal": { "AWS": ["*"] },
            "Resource": [format!("arn:aws:s3:::{}/*", bucket)],
        }],
    })
    .to_string()
}

/// 确保存储桶存在。
///
/// 存储桶不存在时先创建，再设置公开读取策略；已存在时不做任何修改。
/// 先检查再创建的过程没有加锁，多个实例同时首次启动时可能发生竞争。
///
/// # 参数
///
/// * `store` - 对象存储。
/// * `bucket` - 存储桶名称。
///
/// # 返回值
///
/// 本次调用创建了存储桶时返回 `true`。
pub async fn ensure_bucket(store: &dyn ObjectStore, bucket: &str) -> Result<bool, StorageError> {
    info!("检查存储桶 {} 是否存在...", bucket);
    if store.bucket_exists(bucket).await? {
        info!("存储桶已存在");
        return Ok(false);
    }

    info!("存储桶不存在，正在创建...");
    store.create_bucket(bucket).await?;
    info!("存储桶已创建");

    info!("正在设置存储桶策略，允许所有人读取...");
    store
        .set_bucket_policy(bucket, &public_read_policy(bucket))
        .await?;
    info!("策略已设置");

    Ok(true)
}
