//! 备份码实体

use serde::{Deserialize, Serialize};

/// 一次性备份码
///
/// 按签发时的明文存储，`used` 置位后永久失效
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupCode {
    pub code: String,
    pub used: bool,
}

impl BackupCode {
    pub fn new(code: String) -> Self {
        Self { code, used: false }
    }

    /// 标记为已使用
    pub fn mark_as_used(&mut self) {
        self.used = true;
    }

    /// 是否可用
    pub fn is_available(&self) -> bool {
        !self.used
    }
}
