//! TOTP 服务
//!
//! 提供 TOTP secret 生成、注册 URI 与验证码校验

use std::sync::Arc;

use chrono::{DateTime, Utc};
use data_encoding::BASE32;
use totp_rs::{Algorithm, Secret, TOTP};
use warden_errors::{AppError, AppResult};
use warden_ports::RandomSource;

use crate::domain::value_objects::TotpSecret;

/// secret 原始字节数（编码前）
const SECRET_LEN: usize = 20;

/// 时间步长（秒）
const STEP_SECONDS: u64 = 30;

/// 验证码位数
const DIGITS: usize = 6;

/// TOTP 服务
pub struct TotpService {
    issuer: String,
    skew: u8,
    random: Arc<dyn RandomSource>,
}

impl TotpService {
    pub fn new(issuer: String, skew: u8, random: Arc<dyn RandomSource>) -> Self {
        Self {
            issuer,
            skew,
            random,
        }
    }

    /// 生成注册 secret（20 字节随机数据，Base32 编码）
    pub fn generate_secret(&self) -> TotpSecret {
        let mut bytes = [0u8; SECRET_LEN];
        self.random.fill_bytes(&mut bytes);

        TotpSecret::from_encoded(BASE32.encode(&bytes))
    }

    /// 生成注册 URI（otpauth:// 格式）
    pub fn provisioning_uri(&self, account: &str, secret: &TotpSecret) -> String {
        format!(
            "otpauth://totp/{}:{}?secret={}&issuer={}&algorithm=SHA1&digits={}&period={}",
            urlencoding::encode(&self.issuer),
            urlencoding::encode(account),
            secret.as_str(),
            urlencoding::encode(&self.issuer),
            DIGITS,
            STEP_SECONDS
        )
    }

    /// 校验验证码
    ///
    /// 在注入的时间点上检查，容差为前后各 `skew` 个时间步
    pub fn verify_code(
        &self,
        secret: &TotpSecret,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let totp = self.create_totp(secret)?;
        Ok(totp.check(code, now.timestamp() as u64))
    }

    /// 创建 TOTP 实例
    fn create_totp(&self, secret: &TotpSecret) -> AppResult<TOTP> {
        let bytes = Secret::Encoded(secret.as_str().to_string())
            .to_bytes()
            .map_err(|e| AppError::not_enrolled(format!("Invalid TOTP secret: {e}")))?;

        TOTP::new(Algorithm::SHA1, DIGITS, self.skew, STEP_SECONDS, bytes)
            .map_err(|e| AppError::not_enrolled(format!("Invalid TOTP secret: {e}")))
    }
}
