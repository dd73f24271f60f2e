//! 不透明令牌服务
//!
//! 邮箱验证与密码重置共用同一套签发/校验逻辑，有效期由调用方传入

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use warden_errors::{AppError, AppResult};
use warden_ports::RandomSource;

use crate::domain::credential::TokenRecord;

/// 令牌随机字节数（256 位熵）
const TOKEN_LEN: usize = 32;

/// 不透明令牌签发与校验
pub struct TokenService {
    random: Arc<dyn RandomSource>,
}

impl TokenService {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    /// 签发令牌
    ///
    /// # 返回
    /// - `(plaintext, record)`：明文只在这里返回一次，记录中只有
    ///   SHA-256 摘要与过期时间
    pub fn issue(&self, ttl: Duration, now: DateTime<Utc>) -> (String, TokenRecord) {
        let mut bytes = [0u8; TOKEN_LEN];
        self.random.fill_bytes(&mut bytes);

        let plaintext = hex::encode(bytes);
        let record = TokenRecord::new(Self::digest(&plaintext), now + ttl);

        (plaintext, record)
    }

    /// 校验令牌
    ///
    /// 槽位为空或摘要不匹配返回 `TokenInvalid`；已过期返回
    /// `TokenExpired`，过期判断先于摘要比较。校验本身不清空槽位，
    /// 消费由调用方显式完成
    pub fn verify(
        &self,
        candidate: &str,
        record: Option<&TokenRecord>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let Some(record) = record else {
            return Err(AppError::token_invalid("no token outstanding"));
        };

        if record.is_expired(now) {
            return Err(AppError::token_expired("token past its expiry"));
        }

        if Self::digest(candidate) != record.token_hash {
            return Err(AppError::token_invalid("token does not match"));
        }

        Ok(())
    }

    /// SHA-256 摘要（十六进制）
    fn digest(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
