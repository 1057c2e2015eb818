//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで配信メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名**: リマインダーは `Reminder`、通知は `Notification`
//! - **時刻表示**: `dd/mm/YYYY HH:MM` を表示用タイムゾーンで出力し、未設定なら `N/A`

use chrono::{DateTime, FixedOffset, Utc};
use tera::{Context, Tera};
use timewise_domain::{
    mail::{DeliveryError, EmailMessage},
    notification::Notification,
    reminder::Reminder,
};

const REMINDER_SUBJECT: &str = "Reminder";
const NOTIFICATION_SUBJECT: &str = "Notification";
const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

/// テンプレートレンダラー
pub struct TemplateRenderer {
    engine:         Tera,
    display_offset: FixedOffset,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// # 引数
    ///
    /// - `display_offset`: メール本文に表示する時刻のタイムゾーン
    pub fn new(display_offset: FixedOffset) -> Result<Self, DeliveryError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "reminder.html",
                    include_str!("../../templates/mail/reminder.html"),
                ),
                (
                    "reminder.txt",
                    include_str!("../../templates/mail/reminder.txt"),
                ),
                (
                    "notification.html",
                    include_str!("../../templates/mail/notification.html"),
                ),
                (
                    "notification.txt",
                    include_str!("../../templates/mail/notification.txt"),
                ),
            ])
            .map_err(|e| DeliveryError::TemplateFailed(e.to_string()))?;

        Ok(Self {
            engine,
            display_offset,
        })
    }

    /// リマインダーメールを生成する
    ///
    /// 挨拶はリマインダーの所有者宛て。宛先は所有者のアドレスで、
    /// 参加者全員宛てのときは [`EmailMessage::with_recipient`] で差し替える。
    pub fn render_reminder(&self, reminder: &Reminder) -> Result<EmailMessage, DeliveryError> {
        let schedule = reminder.schedule();
        let workspace = reminder.workspace();

        let mut context = Context::new();
        context.insert("owner_email", &reminder.owner().email);
        context.insert("workspace_title", &workspace.title);
        context.insert("workspace_description", &workspace.description);
        context.insert("schedule_title", &schedule.title);
        context.insert("schedule_description", &schedule.description);
        context.insert("start_time", &self.format_time(schedule.start_time));
        context.insert("end_time", &self.format_time(schedule.end_time));

        self.render("reminder", &context, &reminder.owner().email, REMINDER_SUBJECT)
    }

    /// 通知メールを生成する
    pub fn render_notification(
        &self,
        notification: &Notification,
    ) -> Result<EmailMessage, DeliveryError> {
        let mut context = Context::new();
        context.insert("message", &notification.message);

        self.render(
            "notification",
            &context,
            &notification.recipient_email,
            NOTIFICATION_SUBJECT,
        )
    }

    /// リマインダー配信後に作成するフォローアップ通知の本文
    pub fn follow_up_message(&self, reminder: &Reminder) -> String {
        let schedule = reminder.schedule();

        match schedule.start_time {
            Some(start) => {
                let local = start.with_timezone(&self.display_offset);
                format!(
                    "Schedule {} is about to start at {} on {}",
                    schedule.title,
                    local.format("%H:%M"),
                    local.format("%d/%m/%Y")
                )
            }
            None => format!("Schedule {} is about to start", schedule.title),
        }
    }

    fn format_time(&self, time: Option<DateTime<Utc>>) -> String {
        time.map_or_else(
            || "N/A".to_string(),
            |t| t.with_timezone(&self.display_offset).format(DISPLAY_FORMAT).to_string(),
        )
    }

    fn render(
        &self,
        template_name: &str,
        context: &Context,
        to: &str,
        subject: &str,
    ) -> Result<EmailMessage, DeliveryError> {
        let html_body = self
            .engine
            .render(&format!("{template_name}.html"), context)
            .map_err(|e| DeliveryError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(&format!("{template_name}.txt"), context)
            .map_err(|e| DeliveryError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body,
            text_body,
        })
    }
}
