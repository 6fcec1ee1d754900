//! 单元测试共用的端口假实现

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use domain::{ApplicationStatus, Job, JobApplication, Training, User};
use uuid::Uuid;

use crate::{
    cache::{CacheError, CacheStore},
    clock::Clock,
    password::{PasswordHasher, PasswordHasherError},
    queue::{ApplicationMessage, ApplicationQueue, QueueError},
    repository::{
        JobApplicationRepository, JobRepository, RepositoryError, RepositoryResult,
        TrainingRepository, UserRepository,
    },
};

/// 固定时刻的时钟
pub struct FixedClock {
    pub now: DateTime<Utc>,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self {
            now: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// 内存版申请仓储，upsert 语义与 Postgres 实现一致
#[derive(Default)]
pub struct FakeApplicationRepository {
    records: Mutex<HashMap<(Uuid, Uuid), JobApplication>>,
    failures_remaining: AtomicU64,
}

impl FakeApplicationRepository {
    /// 让接下来 n 次 upsert 调用返回存储错误（模拟瞬时故障）
    pub fn fail_next_upserts(&self, n: u64) {
        self.failures_remaining.store(n, Ordering::SeqCst);
    }

    pub fn get(&self, applicant_id: Uuid, posting_id: Uuid) -> Option<JobApplication> {
        self.records
            .lock()
            .unwrap()
            .get(&(applicant_id, posting_id))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn take_failure(&self) -> bool {
        self.failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl JobApplicationRepository for FakeApplicationRepository {
    async fn upsert_pending(
        &self,
        applicant_id: Uuid,
        posting_id: Uuid,
        submitted_at: DateTime<Utc>,
    ) -> RepositoryResult<JobApplication> {
        if self.take_failure() {
            return Err(RepositoryError::storage("simulated outage"));
        }
        let mut records = self.records.lock().unwrap();
        let record = records
            .entry((applicant_id, posting_id))
            .or_insert_with(|| JobApplication::pending(applicant_id, posting_id, submitted_at));
        Ok(record.clone())
    }

    async fn upsert_status(
        &self,
        applicant_id: Uuid,
        posting_id: Uuid,
        status: ApplicationStatus,
        submitted_at: DateTime<Utc>,
    ) -> RepositoryResult<JobApplication> {
        if self.take_failure() {
            return Err(RepositoryError::storage("simulated outage"));
        }
        let mut records = self.records.lock().unwrap();
        let record = records
            .entry((applicant_id, posting_id))
            .or_insert_with(|| JobApplication::pending(applicant_id, posting_id, submitted_at));
        if record.status.can_transition_to(status) {
            record.status = status;
        }
        Ok(record.clone())
    }

    async fn find(
        &self,
        applicant_id: Uuid,
        posting_id: Uuid,
    ) -> RepositoryResult<Option<JobApplication>> {
        Ok(self.get(applicant_id, posting_id))
    }
}

/// 记录发布消息的队列假实现
#[derive(Default)]
pub struct FakeQueue {
    pub published: Mutex<Vec<ApplicationMessage>>,
    failures_remaining: AtomicU64,
}

impl FakeQueue {
    pub fn fail_next_publishes(&self, n: u64) {
        self.failures_remaining.store(n, Ordering::SeqCst);
    }

    pub fn published_count(&self) -> usize {
        self.published.lock().unwrap().len()
    }
}

#[async_trait]
impl ApplicationQueue for FakeQueue {
    async fn publish(&self, message: &ApplicationMessage) -> Result<(), QueueError> {
        let failed = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(QueueError::broker("simulated broker outage"));
        }
        self.published.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// 内存缓存，TTL 仅记录不生效（单元测试不依赖时间流逝）
#[derive(Default)]
pub struct FakeCache {
    entries: Mutex<HashMap<String, String>>,
}

impl FakeCache {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl CacheStore for FakeCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        self.insert_raw(key, value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), CacheError> {
        self.entries
            .lock()
            .unwrap()
            .retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }
}

/// 内存职位仓储
#[derive(Default)]
pub struct FakeJobRepository {
    jobs: Mutex<Vec<Job>>,
}

#[async_trait]
impl JobRepository for FakeJobRepository {
    async fn insert(&self, job: Job) -> RepositoryResult<Job> {
        self.jobs.lock().unwrap().push(job.clone());
        Ok(job)
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Job>> {
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn list_by_location(
        &self,
        location: Option<&str>,
        limit: i64,
    ) -> RepositoryResult<Vec<Job>> {
        let jobs = self.jobs.lock().unwrap();
        Ok(jobs
            .iter()
            .filter(|job| location.is_none_or(|loc| job.location == loc))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// 内存培训仓储
#[derive(Default)]
pub struct FakeTrainingRepository {
    pub trainings: Mutex<Vec<Training>>,
}

#[async_trait]
impl TrainingRepository for FakeTrainingRepository {
    async fn list_by_location(
        &self,
        location: Option<&str>,
        limit: i64,
    ) -> RepositoryResult<Vec<Training>> {
        let trainings = self.trainings.lock().unwrap();
        Ok(trainings
            .iter()
            .filter(|t| location.is_none_or(|loc| t.location == loc))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// 内存用户仓储
#[derive(Default)]
pub struct FakeUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn create(&self, user: User) -> RepositoryResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict);
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}

/// 可逆的测试密码哈希器
pub struct FakePasswordHasher;

#[async_trait]
impl PasswordHasher for FakePasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordHasherError> {
        Ok(format!("hashed_{}", plaintext))
    }

    async fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, PasswordHasherError> {
        Ok(hashed == format!("hashed_{}", plaintext))
    }
}
