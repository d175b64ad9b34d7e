use std::fmt;

use serde_json::Value;

use crate::web::http::HttpError;

// =========================================================
// 错误状态枚举
// =========================================================

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorStatus {
    /// 请求未发出或未收到响应
    Network,
    /// 服务端返回非 2xx
    Http,
    /// 服务端返回 401，会话已被清除
    Unauthorized,
    /// 响应体不是预期的 JSON
    Decode,
    /// 请求体序列化失败
    Encode,
}

// =========================================================
// 核心错误类型
// =========================================================

/// API 调用错误
///
/// `Display` 只输出 message，视图直接展示这段文字。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: ApiErrorStatus,
    /// HTTP 状态码（仅 Http / Unauthorized）
    pub http_status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(status: ApiErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            http_status: None,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorStatus::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorStatus::Decode, message)
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorStatus::Encode, message)
    }

    /// 由非 2xx 响应构造，body 为服务端原始响应体
    pub fn from_response(code: u16, body: &str) -> Self {
        let status = if code == 401 {
            ApiErrorStatus::Unauthorized
        } else {
            ApiErrorStatus::Http
        };
        let message =
            server_message(body).unwrap_or_else(|| format!("HTTP error! status: {}", code));
        Self {
            status,
            http_status: Some(code),
            message,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == ApiErrorStatus::Unauthorized
    }

    pub fn is_not_found(&self) -> bool {
        self.http_status == Some(404)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// 从错误响应体中提取服务端消息
///
/// 依次尝试 `message`、`detail`（字符串，或校验错误列表中的 `msg`）。
/// 响应体不是 JSON 时按空对象处理。
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    if let Some(message) = value.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }

    match value.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        ApiError::network(e.to_string())
    }
}
