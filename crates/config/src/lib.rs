//! warden-config - 配置加载库

use chrono::Duration;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Argon2 成本参数
#[derive(Debug, Clone, Deserialize)]
pub struct Argon2Config {
    #[serde(default = "default_m_cost")]
    pub m_cost: u32,
    #[serde(default = "default_t_cost")]
    pub t_cost: u32,
    #[serde(default = "default_p_cost")]
    pub p_cost: u32,
}

fn default_m_cost() -> u32 {
    19456
}

fn default_t_cost() -> u32 {
    2
}

fn default_p_cost() -> u32 {
    1
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            m_cost: default_m_cost(),
            t_cost: default_t_cost(),
            p_cost: default_p_cost(),
        }
    }
}

/// 凭证策略配置
///
/// 令牌有效期与 TOTP 容差属于策略，不在域服务里写死
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialConfig {
    /// 邮箱验证令牌有效期（小时）
    #[serde(default = "default_email_verification_ttl_hours")]
    pub email_verification_ttl_hours: i64,

    /// 密码重置令牌有效期（分钟）
    #[serde(default = "default_password_reset_ttl_minutes")]
    pub password_reset_ttl_minutes: i64,

    /// TOTP 发行方标签
    #[serde(default = "default_totp_issuer")]
    pub totp_issuer: String,

    /// TOTP 时间步容差（前后各 N 步，每步 30 秒）
    #[serde(default = "default_totp_skew")]
    pub totp_skew: u8,

    #[serde(default)]
    pub argon2: Argon2Config,
}

fn default_email_verification_ttl_hours() -> i64 {
    24
}

fn default_password_reset_ttl_minutes() -> i64 {
    10
}

fn default_totp_issuer() -> String {
    "Warden".to_string()
}

fn default_totp_skew() -> u8 {
    2
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            email_verification_ttl_hours: default_email_verification_ttl_hours(),
            password_reset_ttl_minutes: default_password_reset_ttl_minutes(),
            totp_issuer: default_totp_issuer(),
            totp_skew: default_totp_skew(),
            argon2: Argon2Config::default(),
        }
    }
}

impl CredentialConfig {
    /// 邮箱验证令牌有效期
    pub fn email_verification_ttl(&self) -> Duration {
        Duration::hours(self.email_verification_ttl_hours)
    }

    /// 密码重置令牌有效期
    pub fn password_reset_ttl(&self) -> Duration {
        Duration::minutes(self.password_reset_ttl_minutes)
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub credential: CredentialConfig,
}

fn default_app_name() -> String {
    "warden".to_string()
}

fn default_app_env() -> String {
    "development".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            app_env: default_app_env(),
            telemetry: TelemetryConfig::default(),
            credential: CredentialConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config: Self = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("WARDEN_").split("__"))
            .extract()?;

        Ok(config)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}
