//! # 期限切れリンク要求の削除サイクル
//!
//! データサービスに期限切れのリンク要求を削除させるだけのジョブ。
//! 配信可否の判定やメール送信は行わない。

use std::sync::Arc;

use async_trait::async_trait;
use timewise_infra::data_service::DataServiceClient;
use timewise_shared::{event_log::event, log_business_event};

use super::{CycleError, CycleReport, Job};

/// 期限切れリンク要求の削除サイクル
pub struct CleanupCycle {
    client: Arc<dyn DataServiceClient>,
}

impl CleanupCycle {
    pub fn new(client: Arc<dyn DataServiceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Job for CleanupCycle {
    fn name(&self) -> &'static str {
        "cleanup"
    }

    async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        self.client.clear_expired_link_requests().await?;

        log_business_event!(
            event.category = event::category::MAINTENANCE,
            event.action = event::action::EXPIRED_LINKS_CLEARED,
            event.result = event::result::SUCCESS,
            "期限切れリンク要求を削除"
        );

        Ok(CycleReport::default())
    }
}

#[cfg(test)]
mod tests {
    use timewise_infra::mock::MockDataServiceClient;

    use super::*;

    #[tokio::test]
    async fn test_削除要求を1回だけ送る() {
        let client = MockDataServiceClient::new();
        let sut = CleanupCycle::new(Arc::new(client.clone()));

        let report = sut.run_cycle().await.unwrap();

        assert_eq!(report, CycleReport::default());
        assert_eq!(client.clear_expired_calls(), 1);
    }

    #[tokio::test]
    async fn test_データサービスが失敗したらcollaborator_unavailable() {
        let client = MockDataServiceClient::new();
        client.set_unavailable(true);
        let sut = CleanupCycle::new(Arc::new(client.clone()));

        let result = sut.run_cycle().await;

        assert!(matches!(result, Err(CycleError::CollaboratorUnavailable(_))));
        assert_eq!(client.clear_expired_calls(), 1);
    }
}
