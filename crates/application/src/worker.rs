//! 申请处理逻辑（worker 侧）
//!
//! 每条投递的处理结果是一个显式返回的决策，由消费循环映射为
//! ack / nack(requeue) / 死信发布，而不是在回调内部隐式地产生副作用。
//!
//! 幂等性依赖两点：按自然键的原子 upsert（而非 insert），以及单调的状态
//! 迁移（`Pending`→`Processed` 不可逆）。同一条消息被处理任意次，
//! 最终记录状态都收敛到同一个值，与处理顺序无关。

use std::sync::Arc;

use domain::ApplicationStatus;
use tracing::{error, info, warn};

use crate::{
    clock::Clock,
    queue::ApplicationMessage,
    repository::JobApplicationRepository,
};

/// 单条投递的处理决策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// 持久化已确认，向 broker 确认消息
    Ack,
    /// 瞬时故障，不确认，交由 broker 重投
    Requeue,
    /// 毒消息或重试耗尽：发布到死信队列后确认，绝不无限循环
    DeadLetter,
}

pub struct ApplicationProcessorDependencies {
    pub application_repository: Arc<dyn JobApplicationRepository>,
    pub clock: Arc<dyn Clock>,
    /// 投递次数上限，超过后路由到死信
    pub max_delivery_attempts: u64,
}

/// 申请消息处理器
///
/// 与 broker 无关，可以在多个并发消费者间共享：按键原子的 upsert
/// 是唯一的串行化点。
pub struct ApplicationProcessor {
    deps: ApplicationProcessorDependencies,
}

impl ApplicationProcessor {
    pub fn new(deps: ApplicationProcessorDependencies) -> Self {
        Self { deps }
    }

    /// 处理一条投递。
    ///
    /// `delivery_count` 是 broker 维护的投递次数（首次投递为 1）。
    pub async fn process(&self, payload: &[u8], delivery_count: u64) -> ProcessingOutcome {
        // 解码失败重投无济于事，直接走死信
        let message = match ApplicationMessage::decode(payload) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "毒消息：载荷无法解码，路由到死信");
                return ProcessingOutcome::DeadLetter;
            }
        };

        let now = self.deps.clock.now();
        let upsert = self
            .deps
            .application_repository
            .upsert_status(
                message.applicant_id,
                message.posting_id,
                ApplicationStatus::Processed,
                now,
            )
            .await;

        match upsert {
            Ok(record) => {
                info!(
                    applicant_id = %message.applicant_id,
                    posting_id = %message.posting_id,
                    status = %record.status,
                    "申请处理完成"
                );
                ProcessingOutcome::Ack
            }
            Err(e) if delivery_count >= self.deps.max_delivery_attempts => {
                // 重试耗尽：标记 Failed 并送入死信。标记本身失败时继续重投，
                // 绝不在持久性故障下静默丢弃。
                error!(
                    applicant_id = %message.applicant_id,
                    posting_id = %message.posting_id,
                    delivery_count,
                    error = %e,
                    "投递次数耗尽，标记失败并路由到死信"
                );
                match self
                    .deps
                    .application_repository
                    .upsert_status(
                        message.applicant_id,
                        message.posting_id,
                        ApplicationStatus::Failed,
                        now,
                    )
                    .await
                {
                    Ok(_) => ProcessingOutcome::DeadLetter,
                    Err(mark_err) => {
                        error!(error = %mark_err, "标记失败状态未成功，继续重投");
                        ProcessingOutcome::Requeue
                    }
                }
            }
            Err(e) => {
                warn!(
                    applicant_id = %message.applicant_id,
                    posting_id = %message.posting_id,
                    delivery_count,
                    error = %e,
                    "存储写入失败，等待 broker 重投"
                );
                ProcessingOutcome::Requeue
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{FakeApplicationRepository, FixedClock};
    use domain::ApplicationStatus;
    use uuid::Uuid;

    fn processor(repo: Arc<FakeApplicationRepository>) -> ApplicationProcessor {
        ApplicationProcessor::new(ApplicationProcessorDependencies {
            application_repository: repo,
            clock: Arc::new(FixedClock::default()),
            max_delivery_attempts: 5,
        })
    }

    fn payload(applicant_id: Uuid, posting_id: Uuid) -> Vec<u8> {
        ApplicationMessage::new(applicant_id, posting_id)
            .encode()
            .unwrap()
    }

    #[tokio::test]
    async fn processing_acks_and_marks_processed() {
        let repo = Arc::new(FakeApplicationRepository::default());
        let processor = processor(repo.clone());
        let (applicant, posting) = (Uuid::new_v4(), Uuid::new_v4());

        let outcome = processor.process(&payload(applicant, posting), 1).await;

        assert_eq!(outcome, ProcessingOutcome::Ack);
        let record = repo.get(applicant, posting).unwrap();
        assert_eq!(record.status, ApplicationStatus::Processed);
    }

    #[tokio::test]
    async fn redelivery_is_idempotent() {
        // 模拟 broker 对同一消息的多次投递：记录只有一条，状态不变
        let repo = Arc::new(FakeApplicationRepository::default());
        let processor = processor(repo.clone());
        let (applicant, posting) = (Uuid::new_v4(), Uuid::new_v4());
        let bytes = payload(applicant, posting);

        for delivery in 1..=3 {
            let outcome = processor.process(&bytes, delivery).await;
            assert_eq!(outcome, ProcessingOutcome::Ack);
        }

        assert_eq!(repo.len(), 1);
        let record = repo.get(applicant, posting).unwrap();
        assert_eq!(record.status, ApplicationStatus::Processed);
    }

    #[tokio::test]
    async fn creates_record_defensively_when_producer_write_is_missing() {
        let repo = Arc::new(FakeApplicationRepository::default());
        let processor = processor(repo.clone());
        let (applicant, posting) = (Uuid::new_v4(), Uuid::new_v4());

        // 没有任何 Pending 前置写入
        let outcome = processor.process(&payload(applicant, posting), 1).await;

        assert_eq!(outcome, ProcessingOutcome::Ack);
        assert!(repo.get(applicant, posting).is_some());
    }

    #[tokio::test]
    async fn poison_payload_goes_straight_to_dead_letter() {
        let repo = Arc::new(FakeApplicationRepository::default());
        let processor = processor(repo.clone());

        let outcome = processor.process(b"definitely not json", 1).await;

        assert_eq!(outcome, ProcessingOutcome::DeadLetter);
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn transient_store_failure_requeues() {
        let repo = Arc::new(FakeApplicationRepository::default());
        repo.fail_next_upserts(1);
        let processor = processor(repo.clone());
        let (applicant, posting) = (Uuid::new_v4(), Uuid::new_v4());
        let bytes = payload(applicant, posting);

        let outcome = processor.process(&bytes, 1).await;
        assert_eq!(outcome, ProcessingOutcome::Requeue);

        // 故障恢复后的重投收敛到 Processed
        let outcome = processor.process(&bytes, 2).await;
        assert_eq!(outcome, ProcessingOutcome::Ack);
        assert_eq!(
            repo.get(applicant, posting).unwrap().status,
            ApplicationStatus::Processed
        );
    }

    #[tokio::test]
    async fn exhausted_deliveries_mark_failed_and_dead_letter() {
        let repo = Arc::new(FakeApplicationRepository::default());
        repo.fail_next_upserts(1);
        let processor = processor(repo.clone());
        let (applicant, posting) = (Uuid::new_v4(), Uuid::new_v4());

        // 第 5 次投递仍然失败：标记 Failed（第二次 upsert 成功）并死信
        let outcome = processor.process(&payload(applicant, posting), 5).await;

        assert_eq!(outcome, ProcessingOutcome::DeadLetter);
        assert_eq!(
            repo.get(applicant, posting).unwrap().status,
            ApplicationStatus::Failed
        );
    }

    #[tokio::test]
    async fn failed_marking_keeps_requeueing_instead_of_dropping() {
        let repo = Arc::new(FakeApplicationRepository::default());
        repo.fail_next_upserts(2); // 处理与标记 Failed 都失败
        let processor = processor(repo.clone());
        let (applicant, posting) = (Uuid::new_v4(), Uuid::new_v4());

        let outcome = processor.process(&payload(applicant, posting), 5).await;

        assert_eq!(outcome, ProcessingOutcome::Requeue);
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn processed_record_never_reverts() {
        // 乱序/重复投递下的单调性：先 Processed 再收到旧消息
        let repo = Arc::new(FakeApplicationRepository::default());
        let processor = processor(repo.clone());
        let (applicant, posting) = (Uuid::new_v4(), Uuid::new_v4());
        let bytes = payload(applicant, posting);

        processor.process(&bytes, 1).await;
        let before = repo.get(applicant, posting).unwrap();

        processor.process(&bytes, 2).await;
        let after = repo.get(applicant, posting).unwrap();

        assert_eq!(before, after);
        assert_eq!(after.status, ApplicationStatus::Processed);
    }
}
