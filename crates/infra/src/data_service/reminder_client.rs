//! リマインダー関連のデータサービスクライアント

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use timewise_domain::reminder::{Participant, Reminder, ReminderId, ScheduleId};

use super::{
    client_impl::HttpDataServiceClient,
    response::{handle_empty, handle_list},
    types::{ParticipantDto, ReminderDto},
};
use crate::error::InfraError;

/// リマインダー関連のデータサービスクライアントトレイト
#[async_trait]
pub trait ReminderClient: Send + Sync {
    /// リマインダー一覧を取得する
    ///
    /// データサービスの `GET /reminder` を呼び出す。送信済みも含めて全件返る。
    async fn list_reminders(&self) -> Result<Vec<Reminder>, InfraError>;

    /// リマインダーを送信済みにする
    ///
    /// データサービスの `PUT /reminder/{id}/is_sent` を呼び出す。
    async fn mark_reminder_sent(&self, id: ReminderId) -> Result<(), InfraError>;

    /// スケジュール参加者一覧を取得する
    ///
    /// データサービスの `GET /schedule_participant/schedule/{id}` を呼び出す。
    async fn list_schedule_participants(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Vec<Participant>, InfraError>;
}

#[async_trait]
impl ReminderClient for HttpDataServiceClient {
    async fn list_reminders(&self) -> Result<Vec<Reminder>, InfraError> {
        let response = self.client.get(self.url("/reminder")).send().await?;
        let items: Vec<ReminderDto> = handle_list(response).await?;

        Ok(items.into_iter().map(Reminder::from).collect())
    }

    async fn mark_reminder_sent(&self, id: ReminderId) -> Result<(), InfraError> {
        let response = self
            .client
            .put(self.url(&format!("/reminder/{id}/is_sent")))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        handle_empty(response, Some(InfraError::not_found("Reminder", id.to_string()))).await
    }

    async fn list_schedule_participants(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Vec<Participant>, InfraError> {
        let response = self
            .client
            .get(self.url(&format!("/schedule_participant/schedule/{schedule_id}")))
            .send()
            .await?;
        let items: Vec<ParticipantDto> = handle_list(response).await?;

        Ok(items.into_iter().map(Participant::from).collect())
    }
}
