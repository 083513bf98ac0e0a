//! 上传服务器的配置模块。
//!
//! 该模块负责从环境变量加载配置。所有必需变量在一次校验中检查完毕，
//! 结果要么是完整的配置，要么是全部问题的列表。

use std::env;
use std::fmt;

/// 默认监听端口
pub const DEFAULT_LISTEN_PORT: u16 = 3000;

/// 默认存储桶名称
pub const DEFAULT_BUCKET: &str = "example-bucket";

/// 上传结果 URL 的默认前缀
pub const DEFAULT_PUBLIC_BASE_URL: &str = "https://minio-example.zeabur.app";

/// MinIO 不区分区域，但签名需要一个区域
pub const DEFAULT_REGION: &str = "us-east-1";

/// 必须由环境提供的存储配置项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Endpoint,
    Port,
    User,
    Password,
    UseSsl,
}

impl ConfigField {
    /// 按校验顺序排列的全部必需配置项
    pub const ALL: [ConfigField; 5] = [
        ConfigField::Endpoint,
        ConfigField::Port,
        ConfigField::User,
        ConfigField::Password,
        ConfigField::UseSsl,
    ];

    /// 对应的环境变量名
    pub fn var_name(self) -> &'static str {
        match self {
            ConfigField::Endpoint => "STORAGE_ENDPOINT",
            ConfigField::Port => "STORAGE_PORT",
            ConfigField::User => "STORAGE_USER",
            ConfigField::Password => "STORAGE_PASSWORD",
            ConfigField::UseSsl => "STORAGE_USE_SSL",
        }
    }

    /// 本地运行时，从 MinIO 服务控制台的哪个标签页获取该值
    fn dashboard_tab(self) -> &'static str {
        match self {
            ConfigField::Endpoint | ConfigField::Port => "domain",
            ConfigField::User | ConfigField::Password | ConfigField::UseSsl => "connect",
        }
    }

    fn description(self) -> &'static str {
        match self {
            ConfigField::Endpoint => "endpoint",
            ConfigField::Port => "端口",
            ConfigField::User => "access key",
            ConfigField::Password => "secret key",
            ConfigField::UseSsl => "useSSL",
        }
    }
}

/// 单个配置问题
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigIssue {
    #[error("{} 未设置。是否已部署 MinIO 服务？", .0.var_name())]
    Missing(ConfigField),
    #[error("{var} 不是合法的端口号: {value:?}")]
    InvalidPort { var: &'static str, value: String },
}

impl ConfigIssue {
    /// 面向用户的排查提示
    pub fn hint(&self) -> String {
        match self {
            ConfigIssue::Missing(field) => format!(
                "如果在本地运行，可以在 Zeabur 控制台中 MinIO 服务的 \"{}\" 标签页获取{}。",
                field.dashboard_tab(),
                field.description()
            ),
            ConfigIssue::InvalidPort { .. } => "端口号必须是 0 到 65535 之间的整数。".to_string(),
        }
    }
}

/// 配置校验失败，包含本次发现的全部问题
#[derive(Debug, thiserror::Error)]
#[error("配置不完整，共 {} 个问题", .issues.len())]
pub struct ConfigError {
    pub issues: Vec<ConfigIssue>,
}

/// 对象存储连接配置
#[derive(Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub endpoint: String,
    pub port: u16,
    pub access_key: String,
    pub secret_key: String,
    pub use_ssl: bool,
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("endpoint", &self.endpoint)
            .field("port", &self.port)
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("use_ssl", &self.use_ssl)
            .finish()
    }
}

impl StorageConfig {
    /// 通过查找函数读取并校验存储配置。
    ///
    /// 除 `STORAGE_USE_SSL` 外，空字符串与未设置同样视为缺失；
    /// `STORAGE_USE_SSL` 只有未设置才算缺失，值恰好为 `"true"` 时启用 TLS。
    ///
    /// # 参数
    ///
    /// * `lookup` - 根据变量名返回变量值的函数。
    ///
    /// # 返回值
    ///
    /// 完整的存储配置，或包含全部问题的 `ConfigError`。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut issues = Vec::new();

        let mut required = |field: ConfigField| {
            let value = lookup(field.var_name()).filter(|v| !v.is_empty());
            if value.is_none() {
                issues.push(ConfigIssue::Missing(field));
            }
            value
        };

        let endpoint = required(ConfigField::Endpoint);
        let port = required(ConfigField::Port);
        let access_key = required(ConfigField::User);
        let secret_key = required(ConfigField::Password);

        let use_ssl = lookup(ConfigField::UseSsl.var_name());
        if use_ssl.is_none() {
            issues.push(ConfigIssue::Missing(ConfigField::UseSsl));
        }

        let port = port.and_then(|value| match value.trim().parse::<u16>() {
            Ok(port) => Some(port),
            Err(_) => {
                issues.push(ConfigIssue::InvalidPort {
                    var: ConfigField::Port.var_name(),
                    value,
                });
                None
            }
        });

        match (endpoint, port, access_key, secret_key, use_ssl) {
            (Some(endpoint), Some(port), Some(access_key), Some(secret_key), Some(use_ssl))
                if issues.is_empty() =>
            {
                Ok(Self {
                    endpoint,
                    port,
                    access_key,
                    secret_key,
                    use_ssl: use_ssl == "true",
                })
            }
            _ => Err(ConfigError { issues }),
        }
    }

    /// 存储服务的完整端点 URL，协议由 `use_ssl` 决定
    pub fn endpoint_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.endpoint, self.port)
    }
}

/// 服务器整体配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub listen_port: u16,
    pub bucket: String,
    pub public_base_url: String,
    pub region: String,
}

impl ServerConfig {
    /// 通过查找函数读取服务器配置。
    ///
    /// 存储配置的问题和 `PORT` 的问题会一起报告。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let listen_port = match optional("PORT") {
            None => Ok(DEFAULT_LISTEN_PORT),
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigIssue::InvalidPort {
                var: "PORT",
                value,
            }),
        };

        let storage = StorageConfig::from_lookup(&lookup);

        match (storage, listen_port) {
            (Ok(storage), Ok(listen_port)) => Ok(Self {
                storage,
                listen_port,
                bucket: optional("STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
                public_base_url: optional("PUBLIC_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string()),
                region: optional("STORAGE_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            }),
            (storage, listen_port) => {
                let mut issues = storage.err().map(|e| e.issues).unwrap_or_default();
                if let Err(issue) = listen_port {
                    issues.push(issue);
                }
                Err(ConfigError { issues })
            }
        }
    }

    /// 从进程环境变量读取配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }
}
