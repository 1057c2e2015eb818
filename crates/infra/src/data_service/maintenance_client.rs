//! メンテナンス関連のデータサービスクライアント

use async_trait::async_trait;

use super::{client_impl::HttpDataServiceClient, response::handle_empty};
use crate::error::InfraError;

/// メンテナンス関連のデータサービスクライアントトレイト
#[async_trait]
pub trait MaintenanceClient: Send + Sync {
    /// 期限切れのリンク要求を削除させる
    ///
    /// データサービスの `GET /user_email/clear-expired` を呼び出す。
    async fn clear_expired_link_requests(&self) -> Result<(), InfraError>;
}

#[async_trait]
impl MaintenanceClient for HttpDataServiceClient {
    async fn clear_expired_link_requests(&self) -> Result<(), InfraError> {
        let response = self
            .client
            .get(self.url("/user_email/clear-expired"))
            .send()
            .await?;

        handle_empty(response, None).await
    }
}
