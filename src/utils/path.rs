/// 使用正斜杠连接多个字符串组件
///
/// 自动处理组件前后的斜杠，确保结果中组件之间只有一个正斜杠。
///
/// # 参数
///
/// * `components` - 要连接的字符串组件切片
///
/// # 返回值
///
/// 连接后的字符串，组件之间使用单个正斜杠分隔
///
/// # 示例
///
/// ```
/// use upload_server::utils::path::join_slash;
///
/// assert_eq!(join_slash(&["example-bucket", "abc123"]), "example-bucket/abc123");
/// assert_eq!(join_slash(&["example-bucket/", "/abc123"]), "example-bucket/abc123");
/// assert_eq!(join_slash(&["example-bucket", "", "abc123"]), "example-bucket/abc123");
/// ```
pub fn join_slash(components: &[&str]) -> String {
    components
        .iter()
        .map(|s| s.trim_matches('/')) // 去掉每个组件前后的斜杠
        .filter(|s| !s.is_empty()) // 过滤掉空字符串
        .collect::<Vec<_>>()
        .join("/")
}

/// 构造对象的公开访问 URL，形如 `<base>/<bucket>/<key>`
///
/// # 示例
///
/// ```
/// use upload_server::utils::path::object_url;
///
/// assert_eq!(
///     object_url("https://minio-example.zeabur.app/", "example-bucket", "abc123"),
///     "https://minio-example.zeabur.app/example-bucket/abc123"
/// );
/// ```
pub fn object_url(base_url: &str, bucket: &str, key: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        join_slash(&[bucket, key])
    )
}
