//! S3模块
//!
//! 该模块负责与 S3 兼容的对象存储交互，包括客户端初始化、存储桶准备和对象写入。

// 声明子模块
pub mod body;
pub mod bucket;
pub mod client;
pub mod store;

// 重新导出常用的类型和函数
pub use body::ObjectBody;
pub use bucket::{ensure_bucket, public_read_policy};
pub use client::create_s3_client;
pub use store::{ObjectStore, S3Store, StorageError};
