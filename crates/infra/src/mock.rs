//! # テスト用モック
//!
//! ジョブのテストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! timewise-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use timewise_domain::{
    mail::{DeliveryError, EmailMessage},
    notification::{NewNotification, Notification, NotificationId},
    reminder::{Participant, Reminder, ReminderId, ScheduleId},
    sender::SenderCredential,
};

use crate::{
    data_service::{MaintenanceClient, NotificationClient, ReminderClient},
    error::InfraError,
    mail::{MailTransport, Mailer},
};

// ===== MockDataServiceClient =====

/// インメモリのデータサービス
///
/// 送信済みマークは保持しているレコードに反映されるため、
/// 複数サイクルをまたぐシナリオを再現できる。
#[derive(Clone, Default)]
pub struct MockDataServiceClient {
    reminders:            Arc<Mutex<Vec<Reminder>>>,
    notifications:        Arc<Mutex<Vec<Notification>>>,
    participants:         Arc<Mutex<HashMap<ScheduleId, Vec<Participant>>>>,
    created:              Arc<Mutex<Vec<NewNotification>>>,
    marked_reminders:     Arc<Mutex<Vec<ReminderId>>>,
    marked_notifications: Arc<Mutex<Vec<NotificationId>>>,
    clear_expired_calls:  Arc<Mutex<usize>>,
    unavailable:          Arc<Mutex<bool>>,
    failing_participants: Arc<Mutex<HashSet<ScheduleId>>>,
}

impl MockDataServiceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_reminder(&self, reminder: Reminder) {
        self.reminders.lock().unwrap().push(reminder);
    }

    pub fn add_notification(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }

    pub fn set_participants(&self, schedule_id: ScheduleId, participants: Vec<Participant>) {
        self.participants
            .lock()
            .unwrap()
            .insert(schedule_id, participants);
    }

    /// 以降すべての呼び出しを失敗させる（`false` で復旧）
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }

    /// 指定スケジュールの参加者取得を失敗させる
    pub fn fail_participants_for(&self, schedule_id: ScheduleId) {
        self.failing_participants.lock().unwrap().insert(schedule_id);
    }

    pub fn reminders(&self) -> Vec<Reminder> {
        self.reminders.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    /// 作成されたフォローアップ通知
    pub fn created_notifications(&self) -> Vec<NewNotification> {
        self.created.lock().unwrap().clone()
    }

    /// `mark_reminder_sent` が呼ばれた ID（呼び出し順）
    pub fn marked_reminders(&self) -> Vec<ReminderId> {
        self.marked_reminders.lock().unwrap().clone()
    }

    /// `mark_notification_sent` が呼ばれた ID（呼び出し順）
    pub fn marked_notifications(&self) -> Vec<NotificationId> {
        self.marked_notifications.lock().unwrap().clone()
    }

    pub fn clear_expired_calls(&self) -> usize {
        *self.clear_expired_calls.lock().unwrap()
    }

    fn check_available(&self) -> Result<(), InfraError> {
        if *self.unavailable.lock().unwrap() {
            return Err(InfraError::unexpected_status(503, "service unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl ReminderClient for MockDataServiceClient {
    async fn list_reminders(&self) -> Result<Vec<Reminder>, InfraError> {
        self.check_available()?;
        Ok(self.reminders())
    }

    async fn mark_reminder_sent(&self, id: ReminderId) -> Result<(), InfraError> {
        self.check_available()?;
        let mut reminders = self.reminders.lock().unwrap();
        let reminder = reminders
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| InfraError::not_found("Reminder", id.to_string()))?;
        reminder.mark_sent();
        self.marked_reminders.lock().unwrap().push(id);
        Ok(())
    }

    async fn list_schedule_participants(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Vec<Participant>, InfraError> {
        self.check_available()?;
        if self.failing_participants.lock().unwrap().contains(&schedule_id) {
            return Err(InfraError::unexpected_status(500, "participants unavailable"));
        }
        Ok(self
            .participants
            .lock()
            .unwrap()
            .get(&schedule_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl NotificationClient for MockDataServiceClient {
    async fn list_notifications(&self) -> Result<Vec<Notification>, InfraError> {
        self.check_available()?;
        Ok(self.notifications())
    }

    async fn mark_notification_sent(&self, id: NotificationId) -> Result<(), InfraError> {
        self.check_available()?;
        let mut notifications = self.notifications.lock().unwrap();
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| InfraError::not_found("Notification", id.to_string()))?;
        notification.is_sent = true;
        self.marked_notifications.lock().unwrap().push(id);
        Ok(())
    }

    async fn create_notification(&self, notification: &NewNotification) -> Result<(), InfraError> {
        self.check_available()?;
        self.created.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

#[async_trait]
impl MaintenanceClient for MockDataServiceClient {
    async fn clear_expired_link_requests(&self) -> Result<(), InfraError> {
        *self.clear_expired_calls.lock().unwrap() += 1;
        self.check_available()
    }
}

// ===== MockMailTransport =====

/// 送信元ごとに成否を指定できるトランスポート
///
/// 既定ではすべての送信元で成功する。
#[derive(Clone, Default)]
pub struct MockMailTransport {
    failing:   Arc<Mutex<HashSet<String>>>,
    attempts:  Arc<Mutex<Vec<String>>>,
    delivered: Arc<Mutex<Vec<(String, EmailMessage)>>>,
}

impl MockMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した送信元での送信を失敗させる
    pub fn fail_for(&self, identity: impl Into<String>) {
        self.failing.lock().unwrap().insert(identity.into());
    }

    /// 指定した送信元を復旧させる
    pub fn succeed_for(&self, identity: &str) {
        self.failing.lock().unwrap().remove(identity);
    }

    /// 試行した送信元の ID（試行順）
    pub fn attempted_identities(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    /// 送信に成功した (送信元 ID, メール) の組
    pub fn delivered(&self) -> Vec<(String, EmailMessage)> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn send_mail(
        &self,
        credential: &SenderCredential,
        email: &EmailMessage,
    ) -> Result<(), DeliveryError> {
        self.attempts
            .lock()
            .unwrap()
            .push(credential.identity.clone());

        if self.failing.lock().unwrap().contains(&credential.identity) {
            return Err(DeliveryError::TransportFailed {
                identity: credential.identity.clone(),
                reason:   "connection refused".to_string(),
            });
        }

        self.delivered
            .lock()
            .unwrap()
            .push((credential.identity.clone(), email.clone()));
        Ok(())
    }
}

// ===== MockMailer =====

/// 宛先ごとに成否を指定できるメーラー
///
/// 送信元ローテーションを介さずにジョブをテストするために使う。
#[derive(Clone, Default)]
pub struct MockMailer {
    failing_recipients: Arc<Mutex<HashSet<String>>>,
    sent:               Arc<Mutex<Vec<EmailMessage>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した宛先への送信を失敗させる
    pub fn fail_for(&self, to: impl Into<String>) {
        self.failing_recipients.lock().unwrap().insert(to.into());
    }

    /// 送信に成功したメール
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, email: &EmailMessage) -> Result<(), DeliveryError> {
        if self.failing_recipients.lock().unwrap().contains(&email.to) {
            return Err(DeliveryError::PoolExhausted {
                attempts:   1,
                last_error: format!("{} への送信に失敗", email.to),
            });
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
