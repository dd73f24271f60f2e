//! 凭证记录仓储接口

use async_trait::async_trait;
use warden_common::UserId;
use warden_errors::AppResult;

use crate::domain::credential::CredentialRecord;

/// 凭证记录仓储接口
///
/// `save` 按记录携带的版本号做比较交换：与存储侧版本不一致返回
/// `AppError::Conflict`，成功后存储侧版本加一。两个请求在同一条
/// 记录上竞争时（并发兑换备份码、并发签发重置令牌），后写的一方
/// 拿到冲突并由上层重试
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// 根据用户 ID 查找记录
    async fn find_by_user_id(&self, user_id: &UserId) -> AppResult<Option<CredentialRecord>>;

    /// 带乐观并发检查的保存
    async fn save(&self, record: &CredentialRecord) -> AppResult<()>;
}
