//! 运行时配置
//!
//! 后端地址在编译期通过 `FEEDBACK_API_URL` 注入（如 `FEEDBACK_API_URL=https://api.example.com trunk build`），
//! 未设置时使用本地开发地址。

use leptos::prelude::*;

/// 这些是默认值，如果构建环境中没有定义，则使用这些值
const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TOKEN_KEY: &str = "authToken";
const DEFAULT_USER_KEY: &str = "currentUser";

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 后端 API 根地址（不含末尾斜杠）
    pub api_base_url: String,
    /// LocalStorage 中保存 Bearer 令牌的键
    pub token_key: String,
    /// LocalStorage 中缓存当前用户的键
    pub user_key: String,
}

impl AppConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        let api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        Self {
            api_base_url,
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            user_key: DEFAULT_USER_KEY.to_string(),
        }
    }

    /// 读取编译期环境变量
    pub fn from_env() -> Self {
        Self::new(option_env!("FEEDBACK_API_URL").unwrap_or(DEFAULT_API_BASE_URL))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// 从 Context 获取配置，未提供时回退到编译期默认值
pub fn use_config() -> AppConfig {
    use_context::<AppConfig>().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slashes() {
        let config = AppConfig::new("https://api.example.com//");
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.token_key, "authToken");
        assert_eq!(config.user_key, "currentUser");
    }
}
