//! 密码哈希服务

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use warden_config::Argon2Config;
use warden_errors::{AppError, AppResult};

use crate::domain::value_objects::{HashedPassword, Password};

/// 密码哈希服务（Argon2id）
///
/// 成本参数来自配置；PHC 输出串内编码了算法、盐与成本，
/// 历史记录无需参数迁移即可继续校验
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    pub fn new(config: &Argon2Config) -> AppResult<Self> {
        let params = Params::new(config.m_cost, config.t_cost, config.p_cost, None)
            .map_err(|e| AppError::internal(format!("Invalid Argon2 params: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// 哈希密码（随机盐）
    pub fn hash(&self, password: &Password) -> AppResult<HashedPassword> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_str().as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?
            .to_string();

        Ok(HashedPassword::from_hash(hash))
    }

    /// 校验明文密码
    ///
    /// 不匹配返回 `Ok(false)`；存储的哈希无法解析视为数据完整性错误
    pub fn verify(&self, candidate: &str, hash: &HashedPassword) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash.as_str())
            .map_err(|e| AppError::integrity(format!("Malformed password hash: {e}")))?;

        Ok(self
            .argon2
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 测试用低成本参数，避免每个用例都跑生产强度的哈希
    fn test_service() -> PasswordService {
        PasswordService::new(&Argon2Config {
            m_cost: 1024,
            t_cost: 1,
            p_cost: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_verify_roundtrip() {
        let service = test_service();
        let password = Password::new("Correct horse battery staple").unwrap();

        let hash = service.hash(&password).unwrap();
        assert!(service.verify(password.as_str(), &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let service = test_service();
        let password = Password::new("Correct horse battery staple").unwrap();

        let hash = service.hash(&password).unwrap();
        assert!(!service.verify("Incorrect horse", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_hashes() {
        let service = test_service();
        let password = Password::new("repeatable").unwrap();

        let first = service.hash(&password).unwrap();
        let second = service.hash(&password).unwrap();
        // 盐不同，哈希必然不同
        assert_ne!(first.as_str(), second.as_str());
    }

    #[test]
    fn test_hash_encodes_algorithm_and_cost() {
        let service = test_service();
        let password = Password::new("encoded").unwrap();

        let hash = service.hash(&password).unwrap();
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hash.as_str().contains("m=1024,t=1,p=1"));
    }

    #[test]
    fn test_malformed_hash_is_integrity_error() {
        let service = test_service();
        let corrupt = HashedPassword::from_hash("not-a-phc-string".to_string());

        let err = service.verify("whatever", &corrupt).unwrap_err();
        assert!(matches!(err, AppError::Integrity(_)));
    }
}
