//! 令牌记录实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 不透明令牌的持久化形态
///
/// 只保存 SHA-256 摘要与过期时间；明文在签发时返回给调用方一次，
/// 之后不可恢复
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// 令牌摘要（十六进制）
    pub token_hash: String,

    /// 过期时间
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    pub fn new(token_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            token_hash,
            expires_at,
        }
    }

    /// 检查令牌是否过期
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
