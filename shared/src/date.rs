//! 时间类型模块
//!
//! 后端返回的时间为 ISO 8601 字符串，可能不带时区（如 Python 的
//! `datetime.isoformat()`，微秒精度），也可能是带偏移量的 RFC 3339。
//! `Timestamp` 统一解析为 UTC 的 `NaiveDateTime`，用于排序和展示。

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const SPACED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DISPLAY_FORMAT: &str = "%-d %B %Y";

// =========================================================
// Timestamp - 可传输的时间戳类型
// =========================================================

/// UTC 时间戳，可比较、可序列化
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    #[inline]
    pub const fn new(inner: NaiveDateTime) -> Self {
        Self(inner)
    }

    /// 解析时间字符串
    ///
    /// 返回 None 如果格式无法识别
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.naive_utc()));
        }
        NaiveDateTime::parse_from_str(s, ISO_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(s, SPACED_FORMAT))
            .ok()
            .map(Self)
    }

    #[inline]
    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// 毫秒时间戳
    #[inline]
    pub fn as_millis(&self) -> i64 {
        self.0.and_utc().timestamp_millis()
    }

    /// 页面展示用日期，如 `15 March 2024`
    pub fn format_date(&self) -> String {
        self.0.format(DISPLAY_FORMAT).to_string()
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(inner: NaiveDateTime) -> Self {
        Self(inner)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(ISO_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
