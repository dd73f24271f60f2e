//! 测试辅助：确定性时钟与随机源、服务装配
#![allow(dead_code)]

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, Once};

use chrono::{DateTime, Duration, TimeZone, Utc};
use iam_credential::domain::services::CredentialManager;
use iam_credential::infrastructure::persistence::MemoryCredentialRepository;
use warden_config::{Argon2Config, CredentialConfig};
use warden_ports::{Clock, RandomSource};

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| warden_telemetry::init_tracing("debug"));
}

/// 可推进的固定时钟
pub struct TestClock(Mutex<DateTime<Utc>>);

impl TestClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self(Mutex::new(start))
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }

    pub fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        TestClock::now(self)
    }
}

/// 递增序列随机源：每次调用换一个填充字节，可复现又互不相同
pub struct SeqRandom(AtomicU8);

impl SeqRandom {
    pub fn new() -> Self {
        Self(AtomicU8::new(1))
    }
}

impl RandomSource for SeqRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        let step = self.0.fetch_add(1, Ordering::SeqCst);
        for (i, byte) in dest.iter_mut().enumerate() {
            *byte = step.wrapping_add(i as u8);
        }
    }
}

/// 测试装配：低成本哈希参数 + 内存仓储 + 确定性协作者
pub struct Harness {
    pub manager: CredentialManager,
    pub repo: Arc<MemoryCredentialRepository>,
    pub clock: Arc<TestClock>,
}

impl Harness {
    /// 直接从仓储读出存储侧的记录
    pub async fn repo_record(
        &self,
        user_id: &warden_common::UserId,
    ) -> iam_credential::domain::credential::CredentialRecord {
        use iam_credential::domain::repositories::CredentialRepository;

        self.repo
            .find_by_user_id(user_id)
            .await
            .expect("repository read")
            .expect("record present")
    }
}

pub fn test_start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
}

pub fn test_policy() -> CredentialConfig {
    CredentialConfig {
        argon2: Argon2Config {
            m_cost: 1024,
            t_cost: 1,
            p_cost: 1,
        },
        ..CredentialConfig::default()
    }
}

pub fn harness() -> Harness {
    init_tracing();

    let repo = Arc::new(MemoryCredentialRepository::new());
    let clock = Arc::new(TestClock::new(test_start_time()));

    let manager = CredentialManager::new(
        repo.clone(),
        clock.clone(),
        Arc::new(SeqRandom::new()),
        test_policy(),
    )
    .expect("manager construction");

    Harness {
        manager,
        repo,
        clock,
    }
}
