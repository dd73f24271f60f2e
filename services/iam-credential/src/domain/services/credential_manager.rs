//! 凭证管理服务
//!
//! 面向调用方的入口：每个操作都是一次请求范围的工作单元，
//! 即加载记录、执行一个聚合操作、带版本检查保存。原子性由
//! 仓储的比较交换保证，这里不做加锁

use std::sync::Arc;

use tracing::{debug, info, warn};
use warden_common::UserId;
use warden_config::CredentialConfig;
use warden_errors::{AppError, AppResult};
use warden_ports::{Clock, RandomSource};

use crate::domain::credential::CredentialRecord;
use crate::domain::repositories::CredentialRepository;
use crate::domain::services::{BackupCodeService, PasswordService, TokenService, TotpService};
use crate::domain::value_objects::{Password, TotpSecret};

/// TOTP 注册材料，返回给调用方用于生成注册二维码
#[derive(Debug)]
pub struct TotpEnrollment {
    pub secret: TotpSecret,
    pub provisioning_uri: String,
}

/// 凭证管理服务
pub struct CredentialManager {
    repo: Arc<dyn CredentialRepository>,
    clock: Arc<dyn Clock>,
    policy: CredentialConfig,
    passwords: PasswordService,
    tokens: TokenService,
    totp: TotpService,
    backup_codes: BackupCodeService,
}

impl CredentialManager {
    pub fn new(
        repo: Arc<dyn CredentialRepository>,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
        policy: CredentialConfig,
    ) -> AppResult<Self> {
        let passwords = PasswordService::new(&policy.argon2)?;
        let tokens = TokenService::new(random.clone());
        let totp = TotpService::new(policy.totp_issuer.clone(), policy.totp_skew, random.clone());
        let backup_codes = BackupCodeService::new(random);

        Ok(Self {
            repo,
            clock,
            policy,
            passwords,
            tokens,
            totp,
            backup_codes,
        })
    }

    async fn load(&self, user_id: &UserId) -> AppResult<CredentialRecord> {
        self.repo
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Credential record not found"))
    }

    /// 注册：为新用户创建凭证记录
    pub async fn register(&self, user_id: UserId, password: &str) -> AppResult<CredentialRecord> {
        debug!(user_id = %user_id, "Creating credential record");

        let password = Password::new(password)?;
        let hash = self.passwords.hash(&password)?;
        let record = CredentialRecord::new(user_id, hash, self.clock.now());

        self.repo.save(&record).await?;

        info!(user_id = %record.user_id, "Credential record created");
        Ok(record)
    }

    /// 校验密码
    pub async fn verify_password(&self, user_id: &UserId, candidate: &str) -> AppResult<bool> {
        let record = self.load(user_id).await?;
        self.passwords.verify(candidate, &record.password_hash)
    }

    /// 修改密码
    ///
    /// 新密码与当前密码相同时不重新哈希，返回 `Ok(false)`
    pub async fn change_password(&self, user_id: &UserId, new_password: &str) -> AppResult<bool> {
        let mut record = self.load(user_id).await?;

        if self.passwords.verify(new_password, &record.password_hash)? {
            debug!(user_id = %user_id, "Password unchanged, skipping re-hash");
            return Ok(false);
        }

        let password = Password::new(new_password)?;
        let hash = self.passwords.hash(&password)?;
        record.set_password_hash(hash, self.clock.now());

        self.repo.save(&record).await?;

        info!(user_id = %user_id, "Password changed");
        Ok(true)
    }

    /// 签发邮箱验证令牌
    ///
    /// # 返回
    /// - 令牌明文，仅此一次；记录中只保存摘要
    pub async fn issue_email_verification(&self, user_id: &UserId) -> AppResult<String> {
        let mut record = self.load(user_id).await?;
        let now = self.clock.now();

        let (plaintext, token) = self
            .tokens
            .issue(self.policy.email_verification_ttl(), now);
        let expires_at = token.expires_at;
        record.issue_email_verification(token, now);

        self.repo.save(&record).await?;

        info!(user_id = %user_id, expires_at = %expires_at, "Email verification token issued");
        Ok(plaintext)
    }

    /// 校验并消费邮箱验证令牌
    pub async fn verify_email(&self, user_id: &UserId, candidate: &str) -> AppResult<()> {
        let mut record = self.load(user_id).await?;
        let now = self.clock.now();

        self.tokens
            .verify(candidate, record.email_verification.as_ref(), now)
            .inspect_err(|e| warn!(user_id = %user_id, error = %e, "Email verification failed"))?;

        record.confirm_email_verification(now);
        self.repo.save(&record).await?;

        info!(user_id = %user_id, "Email verified");
        Ok(())
    }

    /// 签发密码重置令牌
    ///
    /// # 返回
    /// - 令牌明文，仅此一次
    pub async fn issue_password_reset(&self, user_id: &UserId) -> AppResult<String> {
        let mut record = self.load(user_id).await?;
        let now = self.clock.now();

        let (plaintext, token) = self.tokens.issue(self.policy.password_reset_ttl(), now);
        let expires_at = token.expires_at;
        record.issue_password_reset(token, now);

        self.repo.save(&record).await?;

        info!(user_id = %user_id, expires_at = %expires_at, "Password reset token issued");
        Ok(plaintext)
    }

    /// 用重置令牌设置新密码，令牌随之消费
    pub async fn reset_password(
        &self,
        user_id: &UserId,
        candidate: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let mut record = self.load(user_id).await?;
        let now = self.clock.now();

        self.tokens
            .verify(candidate, record.password_reset.as_ref(), now)
            .inspect_err(|e| warn!(user_id = %user_id, error = %e, "Password reset rejected"))?;

        let password = Password::new(new_password)?;
        let hash = self.passwords.hash(&password)?;

        record.consume_password_reset(now);
        record.set_password_hash(hash, now);

        self.repo.save(&record).await?;

        info!(user_id = %user_id, "Password reset completed");
        Ok(())
    }

    /// 开始 TOTP 注册
    ///
    /// 生成 secret 并保存，`totp_enabled` 保持不变；确认前重复调用
    /// 会轮换待确认的 secret
    pub async fn enroll_totp(
        &self,
        user_id: &UserId,
        account_label: &str,
    ) -> AppResult<TotpEnrollment> {
        let mut record = self.load(user_id).await?;

        let secret = self.totp.generate_secret();
        record.enroll_totp(secret.clone(), self.clock.now())?;

        self.repo.save(&record).await?;

        let provisioning_uri = self.totp.provisioning_uri(account_label, &secret);

        info!(user_id = %user_id, "TOTP enrollment started");
        Ok(TotpEnrollment {
            secret,
            provisioning_uri,
        })
    }

    /// 确认 TOTP 注册
    ///
    /// 验证码对当前 secret 校验通过才置位 `totp_enabled`；
    /// 校验失败返回 `Ok(false)` 且不改动记录
    pub async fn confirm_totp(&self, user_id: &UserId, code: &str) -> AppResult<bool> {
        let mut record = self.load(user_id).await?;
        let now = self.clock.now();

        let Some(secret) = record.totp_secret.clone() else {
            return Err(AppError::not_enrolled("TOTP enrollment has not started"));
        };

        if !self.totp.verify_code(&secret, code, now)? {
            warn!(user_id = %user_id, "TOTP confirmation code rejected");
            return Ok(false);
        }

        record.confirm_totp(now)?;
        self.repo.save(&record).await?;

        info!(user_id = %user_id, "TOTP enabled");
        Ok(true)
    }

    /// 校验已启用账户的 TOTP 验证码
    pub async fn verify_totp(&self, user_id: &UserId, code: &str) -> AppResult<bool> {
        let record = self.load(user_id).await?;

        if !record.totp_enabled {
            return Err(AppError::not_enrolled(
                "Two-factor authentication is not enabled",
            ));
        }

        let Some(secret) = record.totp_secret.as_ref() else {
            return Err(AppError::integrity("TOTP enabled without a stored secret"));
        };

        self.totp.verify_code(secret, code, self.clock.now())
    }

    /// 停用 TOTP，同时作废备份码
    pub async fn disable_totp(&self, user_id: &UserId) -> AppResult<()> {
        let mut record = self.load(user_id).await?;

        record.disable_totp(self.clock.now());
        self.repo.save(&record).await?;

        info!(user_id = %user_id, "TOTP disabled");
        Ok(())
    }

    /// 生成一整批备份码，替换旧的一批（含未使用的）
    ///
    /// # 返回
    /// - 明文列表，仅此一次返回给调用方展示
    pub async fn generate_backup_codes(&self, user_id: &UserId) -> AppResult<Vec<String>> {
        let mut record = self.load(user_id).await?;

        if record.totp_secret.is_none() {
            return Err(AppError::not_enrolled("TOTP enrollment has not started"));
        }

        let codes = self.backup_codes.generate_codes();
        let plaintext: Vec<String> = codes.iter().map(|c| c.code.clone()).collect();
        record.replace_backup_codes(codes, self.clock.now());

        self.repo.save(&record).await?;

        info!(user_id = %user_id, count = plaintext.len(), "Backup codes rotated");
        Ok(plaintext)
    }

    /// 兑换备份码
    ///
    /// 命中未使用的码则持久化置位；错误或已用过的码返回
    /// `CodeInvalid`，记录不变
    pub async fn redeem_backup_code(&self, user_id: &UserId, code: &str) -> AppResult<()> {
        let mut record = self.load(user_id).await?;

        if !record.redeem_backup_code(code, self.clock.now()) {
            warn!(user_id = %user_id, "Backup code rejected");
            return Err(AppError::code_invalid("invalid or already used backup code"));
        }

        self.repo.save(&record).await?;

        info!(user_id = %user_id, "Backup code redeemed");
        Ok(())
    }

    /// 记录一次登录
    pub async fn record_login(&self, user_id: &UserId) -> AppResult<()> {
        let mut record = self.load(user_id).await?;

        record.record_login(self.clock.now());
        self.repo.save(&record).await?;

        Ok(())
    }
}
