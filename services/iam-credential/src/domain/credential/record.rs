//! 凭证记录聚合

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_common::{AuditInfo, UserId};
use warden_domain_core::{AggregateRoot, Entity};
use warden_errors::AppError;

use super::{BackupCode, TokenRecord};
use crate::domain::value_objects::{HashedPassword, TotpSecret};

/// 凭证记录
///
/// 每个用户身份一条，是本服务唯一持久化的聚合。所有操作只改动
/// 内存中的记录，加载与带版本检查的保存由调用方的工作单元负责
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// 所属用户 ID
    pub user_id: UserId,

    /// 乐观并发版本号，仓储保存时比较并递增
    pub version: u64,

    /// 密码哈希（PHC 字符串），设置后不为空
    pub password_hash: HashedPassword,

    /// 邮箱验证令牌槽，仅在签发与消费/过期之间存在
    pub email_verification: Option<TokenRecord>,

    /// 密码重置令牌槽，生命周期同上，有效期更短
    pub password_reset: Option<TokenRecord>,

    /// TOTP secret，注册开始后存在
    pub totp_secret: Option<TotpSecret>,

    /// 仅在注册期间验证码确认成功后置位
    pub totp_enabled: bool,

    /// 备份码，长度为 0 或恰好一批
    pub backup_codes: Vec<BackupCode>,

    pub email_verified: bool,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,

    pub audit_info: AuditInfo,
}

impl CredentialRecord {
    pub fn new(user_id: UserId, password_hash: HashedPassword, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            version: 0,
            password_hash,
            email_verification: None,
            password_reset: None,
            totp_secret: None,
            totp_enabled: false,
            backup_codes: Vec::new(),
            email_verified: false,
            email_verified_at: None,
            last_login_at: None,
            audit_info: AuditInfo::new(now),
        }
    }

    /// 替换密码哈希
    ///
    /// 是否需要重新哈希由调用方判断，避免对未变更的密码重复哈希
    pub fn set_password_hash(&mut self, password_hash: HashedPassword, now: DateTime<Utc>) {
        self.password_hash = password_hash;
        self.audit_info.touch(now);
    }

    /// 放入新的邮箱验证令牌，旧令牌（如有）立即失效
    pub fn issue_email_verification(&mut self, token: TokenRecord, now: DateTime<Utc>) {
        self.email_verification = Some(token);
        self.audit_info.touch(now);
    }

    /// 消费邮箱验证令牌
    ///
    /// 仅在调用方校验成功后调用：清空令牌槽并标记邮箱已验证
    pub fn confirm_email_verification(&mut self, now: DateTime<Utc>) {
        self.email_verification = None;
        self.email_verified = true;
        self.email_verified_at = Some(now);
        self.audit_info.touch(now);
    }

    /// 放入新的密码重置令牌，旧令牌（如有）立即失效
    pub fn issue_password_reset(&mut self, token: TokenRecord, now: DateTime<Utc>) {
        self.password_reset = Some(token);
        self.audit_info.touch(now);
    }

    /// 消费密码重置令牌（校验成功后调用）
    pub fn consume_password_reset(&mut self, now: DateTime<Utc>) {
        self.password_reset = None;
        self.audit_info.touch(now);
    }

    /// 开始 TOTP 注册：保存 secret，不改变 `totp_enabled`
    ///
    /// 未确认前允许重复注册（覆盖旧 secret）；已启用则拒绝
    pub fn enroll_totp(
        &mut self,
        secret: TotpSecret,
        now: DateTime<Utc>,
    ) -> Result<(), CredentialError> {
        if self.totp_enabled {
            return Err(CredentialError::TotpAlreadyEnabled);
        }

        self.totp_secret = Some(secret);
        self.audit_info.touch(now);
        Ok(())
    }

    /// 确认 TOTP 注册
    ///
    /// 仅在调用方对当前 secret 校验验证码成功后调用，
    /// 这是 `totp_enabled` 置位的唯一路径
    pub fn confirm_totp(&mut self, now: DateTime<Utc>) -> Result<(), CredentialError> {
        if self.totp_secret.is_none() {
            return Err(CredentialError::NotEnrolled);
        }

        self.totp_enabled = true;
        self.audit_info.touch(now);
        Ok(())
    }

    /// 停用 TOTP：清除 secret、启用标记与备份码
    pub fn disable_totp(&mut self, now: DateTime<Utc>) {
        self.totp_secret = None;
        self.totp_enabled = false;
        self.backup_codes.clear();
        self.audit_info.touch(now);
    }

    /// 替换整批备份码，旧码（含未使用的）立即失效
    pub fn replace_backup_codes(&mut self, codes: Vec<BackupCode>, now: DateTime<Utc>) {
        self.backup_codes = codes;
        self.audit_info.touch(now);
    }

    /// 兑换备份码
    ///
    /// 提交值统一转大写后线性查找；命中未使用的条目则置位并返回
    /// true，否则不做任何改动返回 false
    pub fn redeem_backup_code(&mut self, submitted: &str, now: DateTime<Utc>) -> bool {
        let normalized = submitted.to_uppercase();

        let Some(entry) = self
            .backup_codes
            .iter_mut()
            .find(|entry| entry.code == normalized && entry.is_available())
        else {
            return false;
        };

        entry.mark_as_used();
        self.audit_info.touch(now);
        true
    }

    /// 记录一次登录
    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.last_login_at = Some(now);
        self.audit_info.touch(now);
    }
}

impl Entity for CredentialRecord {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.user_id
    }
}

impl AggregateRoot for CredentialRecord {
    fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    fn audit_info_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit_info
    }
}

/// 凭证记录错误
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Two-factor authentication is not enrolled")]
    NotEnrolled,

    #[error("Two-factor authentication is already enabled")]
    TotpAlreadyEnabled,
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::NotEnrolled => AppError::not_enrolled(err.to_string()),
            CredentialError::TotpAlreadyEnabled => AppError::conflict(err.to_string()),
        }
    }
}
