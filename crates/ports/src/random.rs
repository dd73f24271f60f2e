//! 随机源端口

use rand::RngCore;
use rand::rngs::OsRng;

/// 加密安全随机源接口
///
/// 令牌与备份码生成只通过这个接口取随机字节，测试可注入确定性实现
pub trait RandomSource: Send + Sync {
    fn fill_bytes(&self, dest: &mut [u8]);
}

/// 操作系统 CSPRNG
#[derive(Debug, Clone, Default)]
pub struct OsRandomSource;

impl RandomSource for OsRandomSource {
    fn fill_bytes(&self, dest: &mut [u8]) {
        OsRng.fill_bytes(dest);
    }
}
