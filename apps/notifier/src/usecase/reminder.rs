//! # リマインダーサイクル
//!
//! 時間窓 `(now - lookback, now]` に入った未送信リマインダーを配信する。
//!
//! ## 処理の流れ
//!
//! 1. リマインダー一覧を取得し、[`Reminder::is_due`] で絞り込む
//! 2. 配信スコープから宛先を決める（本人のみ / スケジュール参加者全員）
//! 3. 所有者宛ての本文を 1 回だけレンダリングし、宛先ごとに送信する
//! 4. 送信に成功した宛先ごとにフォローアップ通知を作成する
//! 5. 1 件でも成功したらリマインダーを送信済みにする
//!
//! 全宛先で失敗したリマインダーは未送信のまま残り、時間窓の中にある限り次のサイクルで再試行される。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use timewise_domain::{
    clock::Clock,
    eligibility,
    notification::NewNotification,
    reminder::{Recipient, Reminder, ReminderScope},
};
use timewise_infra::{InfraError, data_service::DataServiceClient, mail::Mailer};
use timewise_shared::{
    event_log::{error, event},
    log_business_event,
};
use tracing::Instrument;

use super::{CycleError, CycleReport, Job, TemplateRenderer};

/// リマインダーサイクル
pub struct ReminderCycle {
    client:   Arc<dyn DataServiceClient>,
    mailer:   Arc<dyn Mailer>,
    renderer: Arc<TemplateRenderer>,
    clock:    Arc<dyn Clock>,
    lookback: TimeDelta,
}

impl ReminderCycle {
    pub fn new(
        client: Arc<dyn DataServiceClient>,
        mailer: Arc<dyn Mailer>,
        renderer: Arc<TemplateRenderer>,
        clock: Arc<dyn Clock>,
        lookback: TimeDelta,
    ) -> Self {
        Self {
            client,
            mailer,
            renderer,
            clock,
            lookback,
        }
    }

    /// 配信スコープから宛先を決める
    async fn resolve_recipients(&self, reminder: &Reminder) -> Result<Vec<Recipient>, InfraError> {
        match reminder.scope() {
            ReminderScope::OnlyMe => Ok(vec![reminder.owner().clone()]),
            ReminderScope::AllParticipants => Ok(self
                .client
                .list_schedule_participants(reminder.schedule().id)
                .await?
                .into_iter()
                .map(Recipient::from)
                .collect()),
        }
    }

    /// 1 件のリマインダーを配信する
    ///
    /// 送信済みにできたら `true` を返す。
    async fn dispatch(&self, reminder: &Reminder, now: DateTime<Utc>) -> bool {
        let recipients = match self.resolve_recipients(reminder).await {
            Ok(recipients) => recipients,
            Err(e) => {
                tracing::warn!(
                    error.category = error::category::EXTERNAL_SERVICE,
                    error.kind = error::kind::DATA_SERVICE,
                    error = %e,
                    schedule_id = %reminder.schedule().id,
                    "参加者の取得に失敗したためリマインダーをスキップ"
                );
                return false;
            }
        };

        if recipients.is_empty() {
            tracing::info!(
                schedule_id = %reminder.schedule().id,
                "宛先がないためリマインダーを送信しない"
            );
            return false;
        }

        let email = match self.renderer.render_reminder(reminder) {
            Ok(email) => email,
            Err(e) => {
                tracing::error!(
                    error.category = error::category::INTERNAL,
                    error.kind = error::kind::TEMPLATE,
                    error = %e,
                    "リマインダーテンプレートのレンダリングに失敗"
                );
                return false;
            }
        };
        let follow_up_message = self.renderer.follow_up_message(reminder);
        let notified_at = eligibility::truncate_to_seconds(now);

        let mut delivered = 0;
        for recipient in &recipients {
            if let Err(e) = self.mailer.send(&email.with_recipient(&recipient.email)).await {
                log_business_event!(
                    event.category = event::category::REMINDER,
                    event.action = event::action::REMINDER_FAILED,
                    event.entity_type = event::entity_type::REMINDER,
                    event.entity_id = %reminder.id(),
                    event.result = event::result::FAILURE,
                    reminder.recipient = %recipient.email,
                    error = %e,
                    "リマインダーメール送信失敗"
                );
                continue;
            }
            delivered += 1;

            let follow_up = NewNotification::schedule_reminder(
                recipient.user_email_id,
                reminder.schedule().id,
                follow_up_message.clone(),
                notified_at,
            );
            match self.client.create_notification(&follow_up).await {
                Ok(()) => log_business_event!(
                    event.category = event::category::REMINDER,
                    event.action = event::action::FOLLOW_UP_CREATED,
                    event.entity_type = event::entity_type::NOTIFICATION,
                    event.result = event::result::SUCCESS,
                    reminder.recipient = %recipient.email,
                    "フォローアップ通知を作成"
                ),
                Err(e) => tracing::warn!(
                    error.category = error::category::EXTERNAL_SERVICE,
                    error.kind = error::kind::DATA_SERVICE,
                    error = %e,
                    reminder.recipient = %recipient.email,
                    "フォローアップ通知の作成に失敗"
                ),
            }
        }

        if delivered == 0 {
            return false;
        }

        if let Err(e) = self.client.mark_reminder_sent(reminder.id()).await {
            tracing::error!(
                error.category = error::category::EXTERNAL_SERVICE,
                error.kind = error::kind::DATA_SERVICE,
                error = %e,
                "リマインダーを送信済みにできなかった"
            );
            return false;
        }

        log_business_event!(
            event.category = event::category::REMINDER,
            event.action = event::action::REMINDER_SENT,
            event.entity_type = event::entity_type::REMINDER,
            event.entity_id = %reminder.id(),
            event.result = event::result::SUCCESS,
            reminder.scope = %reminder.scope(),
            reminder.recipients = recipients.len(),
            reminder.delivered = delivered,
            "リマインダー送信成功"
        );
        true
    }
}

#[async_trait]
impl Job for ReminderCycle {
    fn name(&self) -> &'static str {
        "reminder"
    }

    async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let now = self.clock.now();
        let reminders = self.client.list_reminders().await?;

        let due: Vec<&Reminder> = reminders
            .iter()
            .filter(|reminder| reminder.is_due(now, self.lookback))
            .collect();

        let mut report = CycleReport {
            candidates: reminders.len(),
            due: due.len(),
            ..CycleReport::default()
        };

        for reminder in due {
            let span = tracing::info_span!("reminder", reminder_id = %reminder.id());
            if self.dispatch(reminder, now).instrument(span).await {
                report.delivered += 1;
            } else {
                report.failed += 1;
            }
        }

        Ok(report)
    }
}
