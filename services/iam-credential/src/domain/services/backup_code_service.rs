//! 备份码服务
//!
//! 只负责生成一批码；兑换是凭证记录聚合上的操作

use std::sync::Arc;

use warden_ports::RandomSource;

use crate::domain::credential::BackupCode;

/// 每批备份码数量
pub const BACKUP_CODE_COUNT: usize = 10;

/// 每个码的随机字节数，呈现为 8 位大写十六进制
const CODE_BYTES: usize = 4;

/// 备份码服务
pub struct BackupCodeService {
    random: Arc<dyn RandomSource>,
}

impl BackupCodeService {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    /// 生成一整批备份码，全部未使用
    pub fn generate_codes(&self) -> Vec<BackupCode> {
        (0..BACKUP_CODE_COUNT)
            .map(|_| {
                let mut bytes = [0u8; CODE_BYTES];
                self.random.fill_bytes(&mut bytes);
                BackupCode::new(hex::encode_upper(bytes))
            })
            .collect()
    }
}
