//! HTTP请求处理模块
//!
//! 此模块包含了处理不同类型HTTP请求的所有处理器：
//! - 使用说明页处理器
//! - 文件上传处理器

pub mod index;
pub mod upload;

// 重新导出主要的公共接口
pub use index::handle_index;
pub use upload::handle_upload;
