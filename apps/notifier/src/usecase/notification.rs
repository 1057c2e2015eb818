//! # 通知サイクル
//!
//! 送信予定時刻を過ぎた未送信の通知をメール配信し、送信済みにする。
//! リマインダーと違い時間窓の下限はなく、予定時刻未設定の通知は配信しない。

use std::sync::Arc;

use async_trait::async_trait;
use timewise_domain::{clock::Clock, notification::Notification};
use timewise_infra::{data_service::DataServiceClient, mail::Mailer};
use timewise_shared::{
    event_log::{error, event},
    log_business_event,
};
use tracing::Instrument;

use super::{CycleError, CycleReport, Job, TemplateRenderer};

/// 通知サイクル
pub struct NotificationCycle {
    client:   Arc<dyn DataServiceClient>,
    mailer:   Arc<dyn Mailer>,
    renderer: Arc<TemplateRenderer>,
    clock:    Arc<dyn Clock>,
}

impl NotificationCycle {
    pub fn new(
        client: Arc<dyn DataServiceClient>,
        mailer: Arc<dyn Mailer>,
        renderer: Arc<TemplateRenderer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            mailer,
            renderer,
            clock,
        }
    }

    /// 1 件の通知を配信し、送信済みにできたら `true` を返す
    async fn dispatch(&self, notification: &Notification) -> bool {
        let email = match self.renderer.render_notification(notification) {
            Ok(email) => email,
            Err(e) => {
                tracing::error!(
                    error.category = error::category::INTERNAL,
                    error.kind = error::kind::TEMPLATE,
                    error = %e,
                    "通知テンプレートのレンダリングに失敗"
                );
                return false;
            }
        };

        if let Err(e) = self.mailer.send(&email).await {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_FAILED,
                event.entity_type = event::entity_type::NOTIFICATION,
                event.entity_id = %notification.id,
                event.result = event::result::FAILURE,
                notification.recipient = %notification.recipient_email,
                error = %e,
                "通知メール送信失敗"
            );
            return false;
        }

        if let Err(e) = self.client.mark_notification_sent(notification.id).await {
            tracing::error!(
                error.category = error::category::EXTERNAL_SERVICE,
                error.kind = error::kind::DATA_SERVICE,
                error = %e,
                "通知を送信済みにできなかった"
            );
            return false;
        }

        log_business_event!(
            event.category = event::category::NOTIFICATION,
            event.action = event::action::NOTIFICATION_SENT,
            event.entity_type = event::entity_type::NOTIFICATION,
            event.entity_id = %notification.id,
            event.result = event::result::SUCCESS,
            notification.recipient = %notification.recipient_email,
            "通知メール送信成功"
        );
        true
    }
}

#[async_trait]
impl Job for NotificationCycle {
    fn name(&self) -> &'static str {
        "notification"
    }

    async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let now = self.clock.now();
        let notifications = self.client.list_notifications().await?;

        let due: Vec<&Notification> = notifications
            .iter()
            .filter(|notification| notification.is_due(now))
            .collect();

        let mut report = CycleReport {
            candidates: notifications.len(),
            due: due.len(),
            ..CycleReport::default()
        };

        for notification in due {
            let span = tracing::info_span!("notification", notification_id = %notification.id);
            if self.dispatch(notification).instrument(span).await {
                report.delivered += 1;
            } else {
                report.failed += 1;
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use timewise_domain::{clock::FixedClock, notification::NotificationId};
    use timewise_infra::mock::{MockDataServiceClient, MockMailer};

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
    }

    fn make_notification(
        id: i64,
        notified_at: Option<DateTime<Utc>>,
        is_sent: bool,
        email: &str,
    ) -> Notification {
        Notification {
            id: NotificationId::new(id),
            notified_at,
            is_sent,
            recipient_email: email.to_string(),
            message: format!("message {id}"),
        }
    }

    fn make_cycle(client: &MockDataServiceClient, mailer: &MockMailer) -> NotificationCycle {
        NotificationCycle::new(
            Arc::new(client.clone()),
            Arc::new(mailer.clone()),
            Arc::new(TemplateRenderer::new(FixedOffset::east_opt(0).unwrap()).unwrap()),
            Arc::new(FixedClock::new(at(10, 0, 0))),
        )
    }

    #[tokio::test]
    async fn test_予定時刻を過ぎた未送信の通知だけを配信する() {
        let client = MockDataServiceClient::new();
        let mailer = MockMailer::new();
        client.add_notification(make_notification(1, Some(at(9, 0, 0)), false, "a@example.com"));
        client.add_notification(make_notification(2, Some(at(10, 0, 0)), false, "b@example.com"));
        client.add_notification(make_notification(3, Some(at(10, 0, 1)), false, "c@example.com"));
        client.add_notification(make_notification(4, None, false, "d@example.com"));
        client.add_notification(make_notification(5, Some(at(9, 0, 0)), true, "e@example.com"));
        let sut = make_cycle(&client, &mailer);

        let report = sut.run_cycle().await.unwrap();

        assert_eq!(
            report,
            CycleReport {
                candidates: 5,
                due:        2,
                delivered:  2,
                failed:     0,
            }
        );
        let recipients: Vec<String> = mailer.sent().into_iter().map(|m| m.to).collect();
        assert_eq!(recipients, vec!["a@example.com", "b@example.com"]);
        assert_eq!(
            client.marked_notifications(),
            vec![NotificationId::new(1), NotificationId::new(2)]
        );
    }

    #[tokio::test]
    async fn test_通知本文をメッセージとして送る() {
        let client = MockDataServiceClient::new();
        let mailer = MockMailer::new();
        client.add_notification(make_notification(1, Some(at(9, 0, 0)), false, "a@example.com"));
        let sut = make_cycle(&client, &mailer);

        sut.run_cycle().await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent[0].subject, "Notification");
        assert!(sent[0].text_body.contains("message 1"));
    }

    #[tokio::test]
    async fn test_送信失敗した通知は未送信のまま残り他の通知は配信される() {
        let client = MockDataServiceClient::new();
        let mailer = MockMailer::new();
        mailer.fail_for("a@example.com");
        client.add_notification(make_notification(1, Some(at(9, 0, 0)), false, "a@example.com"));
        client.add_notification(make_notification(2, Some(at(9, 0, 0)), false, "b@example.com"));
        let sut = make_cycle(&client, &mailer);

        let report = sut.run_cycle().await.unwrap();

        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(client.marked_notifications(), vec![NotificationId::new(2)]);
        assert!(!client.notifications()[0].is_sent);
    }

    #[tokio::test]
    async fn test_送信済みにした通知は次のサイクルで再送しない() {
        let client = MockDataServiceClient::new();
        let mailer = MockMailer::new();
        client.add_notification(make_notification(1, Some(at(9, 0, 0)), false, "a@example.com"));
        let sut = make_cycle(&client, &mailer);

        sut.run_cycle().await.unwrap();
        let second = sut.run_cycle().await.unwrap();

        assert_eq!(second.due, 0);
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_一覧取得に失敗したらcollaborator_unavailable() {
        let client = MockDataServiceClient::new();
        client.set_unavailable(true);
        let sut = make_cycle(&client, &MockMailer::new());

        let result = sut.run_cycle().await;

        assert!(matches!(result, Err(CycleError::CollaboratorUnavailable(_))));
    }
}
