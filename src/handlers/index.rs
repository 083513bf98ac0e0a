use axum::response::Html;

/// 使用说明页
pub const INDEX_HTML: &str = r#"
  <html lang="en-US">
    <head>
      <title>Axum MinIO example</title>
    </head>
    <body>
      <h1>Axum MinIO example</h1>
      <p>Run following bash command to create a text file:</p>
      <pre>echo "Hello World" > hello.txt</pre>
      <p>Then, run following curl command to upload the file to MinIO storage.</p>
      <pre>curl -X POST -T hello.txt https://minio-express-example.zeabur.app/upload</pre>
    </body>
  </html>
"#;

/// 返回固定的使用说明页
pub async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
