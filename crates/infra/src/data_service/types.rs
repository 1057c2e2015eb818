//! データサービスのレスポンス DTO とドメインモデルへの変換

use chrono::{DateTime, Utc};
use serde::Deserialize;
use timewise_domain::{
    notification::{Notification, NotificationId},
    reminder::{
        Participant,
        Recipient,
        Reminder,
        ReminderId,
        ReminderScope,
        ScheduleId,
        ScheduleSummary,
        UserEmailId,
        WorkspaceSummary,
    },
};

/// ユーザーメール DTO
#[derive(Debug, Clone, Deserialize)]
pub struct UserEmailDto {
    pub id:    i64,
    #[serde(default)]
    pub email: String,
}

/// ワークスペース DTO
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkspaceDto {
    #[serde(default)]
    pub title:       String,
    #[serde(default)]
    pub description: String,
}

/// ワークスペースユーザー DTO
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceUserDto {
    #[serde(default)]
    pub workspace:  WorkspaceDto,
    pub user_email: UserEmailDto,
}

/// スケジュール DTO
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleDto {
    pub id:          i64,
    #[serde(default)]
    pub title:       String,
    #[serde(default)]
    pub description: String,
    pub start_time:  Option<DateTime<Utc>>,
    pub end_time:    Option<DateTime<Utc>>,
}

/// リマインダー DTO（`GET /reminder` の要素）
#[derive(Debug, Clone, Deserialize)]
pub struct ReminderDto {
    pub id:             i64,
    pub reminder_time:  DateTime<Utc>,
    #[serde(default)]
    pub is_sent:        bool,
    /// 配信スコープ（`"only me"` 以外は参加者全員）
    #[serde(rename = "type", default)]
    pub scope:          String,
    pub schedule:       ScheduleDto,
    pub workspace_user: WorkspaceUserDto,
}

/// 通知 DTO（`GET /notification` の要素）
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationDto {
    pub id:          i64,
    pub notified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_sent:     bool,
    #[serde(default)]
    pub message:     String,
    pub user_email:  UserEmailDto,
}

/// スケジュール参加者 DTO（`GET /schedule_participant/schedule/{id}` の要素）
#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantDto {
    pub email:   String,
    pub user_id: i64,
}

impl From<ReminderDto> for Reminder {
    fn from(dto: ReminderDto) -> Self {
        let owner = Recipient {
            user_email_id: UserEmailId::new(dto.workspace_user.user_email.id),
            email:         dto.workspace_user.user_email.email,
        };

        Reminder::new(
            ReminderId::new(dto.id),
            dto.reminder_time,
            dto.is_sent,
            ReminderScope::from_wire(&dto.scope),
            ScheduleSummary {
                id:          ScheduleId::new(dto.schedule.id),
                title:       dto.schedule.title,
                description: dto.schedule.description,
                start_time:  dto.schedule.start_time,
                end_time:    dto.schedule.end_time,
            },
            WorkspaceSummary {
                title:       dto.workspace_user.workspace.title,
                description: dto.workspace_user.workspace.description,
            },
            owner,
        )
    }
}

impl From<NotificationDto> for Notification {
    fn from(dto: NotificationDto) -> Self {
        Notification {
            id:              NotificationId::new(dto.id),
            notified_at:     dto.notified_at,
            is_sent:         dto.is_sent,
            recipient_email: dto.user_email.email,
            message:         dto.message,
        }
    }
}

impl From<ParticipantDto> for Participant {
    fn from(dto: ParticipantDto) -> Self {
        Participant {
            email:   dto.email,
            user_id: UserEmailId::new(dto.user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_リマインダーjsonをドメインモデルに変換できる() {
        let json = r#"{
            "id": 42,
            "reminder_time": "2024-01-01T17:00:00.250+07:00",
            "is_sent": false,
            "type": "only me",
            "schedule": {
                "id": 9,
                "title": "Sprint review",
                "description": "Demo",
                "start_time": "2024-01-01T10:30:00Z",
                "end_time": null
            },
            "workspace_user": {
                "workspace": { "title": "Team A", "description": "Backend" },
                "user_email": { "id": 3, "email": "owner@example.com" }
            }
        }"#;

        let dto: ReminderDto = serde_json::from_str(json).unwrap();
        let reminder = Reminder::from(dto);

        assert_eq!(reminder.id(), ReminderId::new(42));
        assert_eq!(
            reminder.reminder_time(),
            DateTime::parse_from_rfc3339("2024-01-01T10:00:00.250Z")
                .unwrap()
                .with_timezone(&Utc)
        );
        assert_eq!(reminder.scope(), ReminderScope::OnlyMe);
        assert_eq!(reminder.schedule().id, ScheduleId::new(9));
        assert_eq!(reminder.schedule().end_time, None);
        assert_eq!(reminder.workspace().title, "Team A");
        assert_eq!(reminder.owner().email, "owner@example.com");
        assert_eq!(reminder.owner().user_email_id, UserEmailId::new(3));
    }

    #[test]
    fn test_スコープ未設定のリマインダーは参加者全員宛て() {
        let json = r#"{
            "id": 1,
            "reminder_time": "2024-01-01T10:00:00Z",
            "schedule": { "id": 9, "start_time": null, "end_time": null },
            "workspace_user": { "user_email": { "id": 3, "email": "owner@example.com" } }
        }"#;

        let reminder = Reminder::from(serde_json::from_str::<ReminderDto>(json).unwrap());

        assert_eq!(reminder.scope(), ReminderScope::AllParticipants);
        assert!(!reminder.is_sent());
        assert_eq!(reminder.workspace(), &WorkspaceSummary::default());
    }

    #[test]
    fn test_通知jsonをドメインモデルに変換できる() {
        let json = r#"{
            "id": 7,
            "notified_at": null,
            "is_sent": false,
            "message": "Schedule Standup is about to start",
            "user_email": { "id": 3, "email": "member@example.com" }
        }"#;

        let notification = Notification::from(serde_json::from_str::<NotificationDto>(json).unwrap());

        assert_eq!(notification.id, NotificationId::new(7));
        assert_eq!(notification.notified_at, None);
        assert_eq!(notification.recipient_email, "member@example.com");
    }
}
