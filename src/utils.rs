//! 工具函数模块
//!
//! 此模块包含了项目中使用的各种工具函数：
//! - 对象键生成工具
//! - 路径拼接工具（构造对象的公开 URL）

pub mod key;
pub mod path;
