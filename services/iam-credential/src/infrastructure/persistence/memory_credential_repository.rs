//! 内存凭证仓储
//!
//! 以 JSON 文档保存记录副本并实现版本比较交换，供测试与本地
//! 演示使用

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use warden_common::UserId;
use warden_errors::{AppError, AppResult};

use crate::domain::credential::CredentialRecord;
use crate::domain::repositories::CredentialRepository;

/// 内存实现
#[derive(Default)]
pub struct MemoryCredentialRepository {
    records: RwLock<HashMap<UserId, serde_json::Value>>,
}

impl MemoryCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialRepository for MemoryCredentialRepository {
    async fn find_by_user_id(&self, user_id: &UserId) -> AppResult<Option<CredentialRecord>> {
        let records = self.records.read().await;

        match records.get(user_id) {
            Some(doc) => {
                let record = serde_json::from_value(doc.clone()).map_err(|e| {
                    AppError::integrity(format!("Corrupt credential document: {e}"))
                })?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, record: &CredentialRecord) -> AppResult<()> {
        let mut records = self.records.write().await;

        let stored_version = match records.get(&record.user_id) {
            Some(doc) => doc
                .get("version")
                .and_then(serde_json::Value::as_u64)
                .ok_or_else(|| AppError::integrity("Credential document missing version"))?,
            None => 0,
        };

        if stored_version != record.version {
            return Err(AppError::conflict(format!(
                "Stale credential record: stored version {stored_version}, got {}",
                record.version
            )));
        }

        let mut next = record.clone();
        next.version += 1;

        let doc = serde_json::to_value(&next)
            .map_err(|e| AppError::internal(format!("Failed to serialize record: {e}")))?;
        records.insert(next.user_id.clone(), doc);

        Ok(())
    }
}
