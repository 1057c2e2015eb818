//! 通知関連のデータサービスクライアント

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use timewise_domain::notification::{NewNotification, Notification, NotificationId};

use super::{
    client_impl::HttpDataServiceClient,
    response::{handle_empty, handle_list},
    types::NotificationDto,
};
use crate::error::InfraError;

/// 通知関連のデータサービスクライアントトレイト
#[async_trait]
pub trait NotificationClient: Send + Sync {
    /// 通知一覧を取得する
    ///
    /// データサービスの `GET /notification` を呼び出す。
    async fn list_notifications(&self) -> Result<Vec<Notification>, InfraError>;

    /// 通知を送信済みにする
    ///
    /// データサービスの `PUT /notification/{id}` を呼び出す。
    async fn mark_notification_sent(&self, id: NotificationId) -> Result<(), InfraError>;

    /// フォローアップ通知を作成する
    ///
    /// データサービスの `POST /notification` を呼び出す。
    async fn create_notification(&self, notification: &NewNotification) -> Result<(), InfraError>;
}

#[async_trait]
impl NotificationClient for HttpDataServiceClient {
    async fn list_notifications(&self) -> Result<Vec<Notification>, InfraError> {
        let response = self.client.get(self.url("/notification")).send().await?;
        let items: Vec<NotificationDto> = handle_list(response).await?;

        Ok(items.into_iter().map(Notification::from).collect())
    }

    async fn mark_notification_sent(&self, id: NotificationId) -> Result<(), InfraError> {
        let response = self
            .client
            .put(self.url(&format!("/notification/{id}")))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        handle_empty(
            response,
            Some(InfraError::not_found("Notification", id.to_string())),
        )
        .await
    }

    async fn create_notification(&self, notification: &NewNotification) -> Result<(), InfraError> {
        let response = self
            .client
            .post(self.url("/notification"))
            .json(notification)
            .send()
            .await?;

        handle_empty(response, None).await
    }
}
