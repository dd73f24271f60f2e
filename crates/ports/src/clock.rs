//! 时钟端口
//!
//! 过期判断与 TOTP 时间步都从这里取 now，测试可注入固定时钟

use chrono::{DateTime, Utc};

/// 时钟接口
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时钟
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
