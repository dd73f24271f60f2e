//! iam-credential - 凭证域服务
//!
//! 用户身份记录上的安全敏感操作：密码哈希与校验、短期令牌
//! （邮箱验证、密码重置）、TOTP 两步验证、一次性备份码

pub mod domain;
pub mod infrastructure;
