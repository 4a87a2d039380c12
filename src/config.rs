//! 应用配置，从环境变量（及可选的 `.env` 文件）加载

use std::time::Duration;

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// 运行模式，开发模式下 500 响应附带错误细节
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    Development,
    Production,
}

impl RuntimeMode {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("development") {
            RuntimeMode::Development
        } else {
            RuntimeMode::Production
        }
    }

    pub fn is_development(self) -> bool {
        self == RuntimeMode::Development
    }
}

/// CORS 来源白名单
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    /// `*` 表示任意来源，否则按逗号拆分并去掉空白
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == "*" {
            return CorsOrigins::Any;
        }

        CorsOrigins::List(
            value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

/// HTTP 服务配置
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
    /// 请求超时时间
    pub request_timeout: Duration,
}

/// 限流配置
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub max_requests: usize,
    pub window: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub mode: RuntimeMode,
    pub cors_origins: CorsOrigins,
    pub rate_limit: RateLimitConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig {
                bind_address: "0.0.0.0".to_string(),
                port: 3000,
                request_timeout: Duration::from_secs(30),
            },
            mode: RuntimeMode::Production,
            cors_origins: CorsOrigins::Any,
            rate_limit: RateLimitConfig {
                enabled: false,
                max_requests: 100,
                window: Duration::from_secs(15 * 60),
            },
        }
    }
}

impl AppConfig {
    /// 读取进程环境变量
    pub fn from_env() -> Result<Self, ConfigError> {
        // .env 文件是可选的
        let _ = dotenv::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 通过任意查找函数构建配置，缺省值见 `Default`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(host) = lookup("HOST") {
            config.http.bind_address = host;
        }
        if let Some(port) = lookup("PORT") {
            config.http.port = parse_number("PORT", &port)?;
        }
        if let Some(secs) = lookup("REQUEST_TIMEOUT_SECS") {
            config.http.request_timeout = Duration::from_secs(parse_number("REQUEST_TIMEOUT_SECS", &secs)?);
        }
        if let Some(mode) = lookup("APP_ENV") {
            config.mode = RuntimeMode::parse(&mode);
        }
        if let Some(origins) = lookup("CORS_ORIGIN") {
            config.cors_origins = CorsOrigins::parse(&origins);
        }
        if let Some(enabled) = lookup("RATE_LIMIT_ENABLED") {
            config.rate_limit.enabled = parse_bool("RATE_LIMIT_ENABLED", &enabled)?;
        }
        if let Some(max) = lookup("RATE_LIMIT_MAX_REQUESTS") {
            config.rate_limit.max_requests = parse_number("RATE_LIMIT_MAX_REQUESTS", &max)?;
        }
        if let Some(secs) = lookup("RATE_LIMIT_WINDOW_SECS") {
            config.rate_limit.window = Duration::from_secs(parse_number("RATE_LIMIT_WINDOW_SECS", &secs)?);
        }

        Ok(config)
    }

    pub fn with_mode(mut self, mode: RuntimeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_cors_origins(mut self, origins: &str) -> Self {
        self.cors_origins = CorsOrigins::parse(origins);
        self
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.http.bind_address, self.http.port)
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.mode, RuntimeMode::Production);
        assert_eq!(config.cors_origins, CorsOrigins::Any);
        assert!(!config.rate_limit.enabled);
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("APP_ENV", "development"),
            ("CORS_ORIGIN", "https://a.com, https://b.com"),
            ("RATE_LIMIT_ENABLED", "true"),
            ("RATE_LIMIT_MAX_REQUESTS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.http.port, 8080);
        assert!(config.mode.is_development());
        assert_eq!(
            config.cors_origins,
            CorsOrigins::List(vec!["https://a.com".to_string(), "https://b.com".to_string()])
        );
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.max_requests, 5);
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "not-a-port")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn cors_origins_parsing() {
        assert_eq!(CorsOrigins::parse("*"), CorsOrigins::Any);
        assert_eq!(CorsOrigins::parse(" * "), CorsOrigins::Any);
        assert_eq!(
            CorsOrigins::parse("https://custom-origin.com"),
            CorsOrigins::List(vec!["https://custom-origin.com".to_string()])
        );
        assert_eq!(
            CorsOrigins::parse("https://a.com,, https://b.com "),
            CorsOrigins::List(vec!["https://a.com".to_string(), "https://b.com".to_string()])
        );
    }

    #[test]
    fn runtime_mode_parsing() {
        assert_eq!(RuntimeMode::parse("development"), RuntimeMode::Development);
        assert_eq!(RuntimeMode::parse("Development"), RuntimeMode::Development);
        assert_eq!(RuntimeMode::parse("production"), RuntimeMode::Production);
        assert_eq!(RuntimeMode::parse("test"), RuntimeMode::Production);
    }
}
