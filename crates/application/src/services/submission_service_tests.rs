//! 提交服务单元测试
//!
//! 覆盖 write-before-publish 顺序、发布失败后的 Pending 残留、
//! 以及重复提交的幂等处理。

use std::sync::Arc;

use domain::ApplicationStatus;
use uuid::Uuid;

use super::test_support::{FakeApplicationRepository, FakeQueue, FixedClock};
use crate::{
    error::ApplicationError,
    services::{SubmissionService, SubmissionServiceDependencies},
};

fn service(
    repo: Arc<FakeApplicationRepository>,
    queue: Arc<FakeQueue>,
) -> SubmissionService {
    SubmissionService::new(SubmissionServiceDependencies {
        application_repository: repo,
        queue,
        clock: Arc::new(FixedClock::default()),
    })
}

#[tokio::test]
async fn submit_writes_pending_then_publishes() {
    let repo = Arc::new(FakeApplicationRepository::default());
    let queue = Arc::new(FakeQueue::default());
    let service = service(repo.clone(), queue.clone());
    let (applicant, posting) = (Uuid::new_v4(), Uuid::new_v4());

    let accepted = service.submit(applicant, posting).await.unwrap();

    assert_eq!(accepted.applicant_id, applicant);
    assert_eq!(accepted.posting_id, posting);
    let record = repo.get(applicant, posting).unwrap();
    assert_eq!(record.status, ApplicationStatus::Pending);
    assert_eq!(queue.published_count(), 1);
}

#[tokio::test]
async fn no_message_without_durable_record() {
    // 持久化失败时必须整体失败，绝不发布孤儿消息
    let repo = Arc::new(FakeApplicationRepository::default());
    repo.fail_next_upserts(1);
    let queue = Arc::new(FakeQueue::default());
    let service = service(repo.clone(), queue.clone());

    let result = service.submit(Uuid::new_v4(), Uuid::new_v4()).await;

    assert!(matches!(result, Err(ApplicationError::Repository(_))));
    assert_eq!(queue.published_count(), 0);
    assert_eq!(repo.len(), 0);
}

#[tokio::test]
async fn publish_failure_leaves_pending_record_and_allows_retry() {
    let repo = Arc::new(FakeApplicationRepository::default());
    let queue = Arc::new(FakeQueue::default());
    queue.fail_next_publishes(1);
    let service = service(repo.clone(), queue.clone());
    let (applicant, posting) = (Uuid::new_v4(), Uuid::new_v4());

    let result = service.submit(applicant, posting).await;
    assert!(matches!(result, Err(ApplicationError::Queue(_))));

    // 记录保持 Pending，等待重试
    let record = repo.get(applicant, posting).unwrap();
    assert_eq!(record.status, ApplicationStatus::Pending);

    // 调用方重试：幂等写入不产生第二条记录，消息补发成功
    let accepted = service.submit(applicant, posting).await.unwrap();
    assert_eq!(accepted.submitted_at, record.submitted_at);
    assert_eq!(repo.len(), 1);
    assert_eq!(queue.published_count(), 1);
}

#[tokio::test]
async fn duplicate_submission_is_ordinary_success() {
    let repo = Arc::new(FakeApplicationRepository::default());
    let queue = Arc::new(FakeQueue::default());
    let service = service(repo.clone(), queue.clone());
    let (applicant, posting) = (Uuid::new_v4(), Uuid::new_v4());

    let first = service.submit(applicant, posting).await.unwrap();
    let second = service.submit(applicant, posting).await.unwrap();

    // 同一自然键始终只有一条记录，submitted_at 不被覆盖
    assert_eq!(repo.len(), 1);
    assert_eq!(first.submitted_at, second.submitted_at);
    // 每次受理都发布一条消息——幂等处理消化重复投递
    assert_eq!(queue.published_count(), 2);
}
