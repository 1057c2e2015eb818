//! # 通知
//!
//! データサービスが保持するユーザー通知のドメインモデル。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`Notification`] | 通知 | 送信予定時刻を過ぎたらメール配信する通知レコード |
//! | [`NewNotification`] | フォローアップ通知 | リマインダー配信後に宛先ごとに作成する通知 |
//! | [`NotificationKind`] | 通知種別 | データサービス上の `type` フィールド |

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    eligibility,
    reminder::{ScheduleId, UserEmailId},
};

define_record_id! {
    /// 通知 ID
    pub struct NotificationId;
}

/// 通知種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// リマインダー配信に伴う通知
    Reminder,
}

/// 関連アイテム種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedItemType {
    Schedule,
}

/// 通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id:              NotificationId,
    /// 送信予定時刻（未設定の通知は配信しない）
    pub notified_at:     Option<DateTime<Utc>>,
    pub is_sent:         bool,
    pub recipient_email: String,
    pub message:         String,
}

impl Notification {
    /// `now` 時点で配信対象か
    ///
    /// → [`eligibility::is_due_by`]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        eligibility::is_due_by(now, self.notified_at, self.is_sent)
    }
}

/// フォローアップ通知（データサービスへの作成リクエスト）
///
/// リマインダーの配信に成功した宛先ごとに 1 件作成する。
/// 作成時点では未読・未送信で、送信予定時刻は配信時刻。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNotification {
    pub user_email_id:     UserEmailId,
    #[serde(rename = "type")]
    pub kind:              NotificationKind,
    pub message:           String,
    pub is_read:           bool,
    pub related_item_id:   ScheduleId,
    pub related_item_type: RelatedItemType,
    pub extra_data:        String,
    pub is_sent:           bool,
    pub notified_at:       DateTime<Utc>,
}

impl NewNotification {
    /// スケジュールリマインダー配信後のフォローアップ通知を作成する
    pub fn schedule_reminder(
        user_email_id: UserEmailId,
        schedule_id: ScheduleId,
        message: String,
        notified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_email_id,
            kind: NotificationKind::Reminder,
            message,
            is_read: false,
            related_item_id: schedule_id,
            related_item_type: RelatedItemType::Schedule,
            extra_data: String::new(),
            is_sent: false,
            notified_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_フォローアップ通知は未読未送信で作成される() {
        let now = DateTime::from_timestamp(1_704_103_290, 0).unwrap();

        let sut = NewNotification::schedule_reminder(
            UserEmailId::new(5),
            ScheduleId::new(12),
            "Schedule Standup is about to start".to_string(),
            now,
        );

        assert!(!sut.is_read);
        assert!(!sut.is_sent);
        assert_eq!(sut.kind, NotificationKind::Reminder);
        assert_eq!(sut.related_item_type, RelatedItemType::Schedule);
        assert_eq!(sut.extra_data, "");
        assert_eq!(sut.notified_at, now);
    }

    #[test]
    fn test_フォローアップ通知はデータサービスの形式でシリアライズされる() {
        let now = DateTime::from_timestamp(1_704_103_290, 0).unwrap();
        let sut = NewNotification::schedule_reminder(
            UserEmailId::new(5),
            ScheduleId::new(12),
            "hello".to_string(),
            now,
        );

        let value = serde_json::to_value(&sut).unwrap();

        assert_eq!(
            value,
            json!({
                "user_email_id": 5,
                "type": "reminder",
                "message": "hello",
                "is_read": false,
                "related_item_id": 12,
                "related_item_type": "schedule",
                "extra_data": "",
                "is_sent": false,
                "notified_at": "2024-01-01T10:01:30Z",
            })
        );
    }

    #[test]
    fn test_通知のis_dueは予定時刻未設定なら偽() {
        let notification = Notification {
            id:              NotificationId::new(1),
            notified_at:     None,
            is_sent:         false,
            recipient_email: "a@example.com".to_string(),
            message:         "m".to_string(),
        };

        assert!(!notification.is_due(Utc::now()));
    }
}
