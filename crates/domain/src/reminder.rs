//! # リマインダー
//!
//! データサービスが保持するスケジュールリマインダーのドメインモデル。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`Reminder`] | リマインダー | 予定時刻に配信するスケジュールの事前通知 |
//! | [`ReminderScope`] | 配信スコープ | 本人のみ / スケジュール参加者全員 |
//! | [`Participant`] | 参加者 | スケジュールに参加しているユーザーのメールアドレス |
//!
//! レコードの生成・削除はデータサービスが行う。このプロセスが変更するのは
//! 配信成功後の送信済みフラグのみ。

use chrono::{DateTime, TimeDelta, Utc};

use crate::eligibility;

define_record_id! {
    /// リマインダー ID
    pub struct ReminderId;
}

define_record_id! {
    /// スケジュール ID
    pub struct ScheduleId;
}

define_record_id! {
    /// ユーザーメール ID
    ///
    /// データサービス上でユーザーのメールアドレス 1 件を指す ID。
    /// フォローアップ通知の宛先指定に使う。
    pub struct UserEmailId;
}

/// 配信スコープ
///
/// データサービス上の文字列表現は `"only me"` のみが本人宛て。
/// それ以外の値はすべて参加者全員宛てとして扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ReminderScope {
    /// 本人のみ
    OnlyMe,
    /// スケジュール参加者全員
    AllParticipants,
}

impl ReminderScope {
    /// データサービスの `type` フィールドからスコープを決定する
    pub fn from_wire(value: &str) -> Self {
        if value == "only me" {
            Self::OnlyMe
        } else {
            Self::AllParticipants
        }
    }
}

/// 宛先（メールアドレスとユーザーメール ID の組）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub user_email_id: UserEmailId,
    pub email:         String,
}

/// スケジュール参加者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub email:   String,
    pub user_id: UserEmailId,
}

impl From<Participant> for Recipient {
    fn from(participant: Participant) -> Self {
        Self {
            user_email_id: participant.user_id,
            email:         participant.email,
        }
    }
}

/// リマインダーに紐づくスケジュールの概要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub id:          ScheduleId,
    pub title:       String,
    pub description: String,
    pub start_time:  Option<DateTime<Utc>>,
    pub end_time:    Option<DateTime<Utc>>,
}

/// リマインダーに紐づくワークスペースの概要
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkspaceSummary {
    pub title:       String,
    pub description: String,
}

/// リマインダー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    id:            ReminderId,
    reminder_time: DateTime<Utc>,
    is_sent:       bool,
    scope:         ReminderScope,
    schedule:      ScheduleSummary,
    workspace:     WorkspaceSummary,
    owner:         Recipient,
}

impl Reminder {
    pub fn new(
        id: ReminderId,
        reminder_time: DateTime<Utc>,
        is_sent: bool,
        scope: ReminderScope,
        schedule: ScheduleSummary,
        workspace: WorkspaceSummary,
        owner: Recipient,
    ) -> Self {
        Self {
            id,
            reminder_time,
            is_sent,
            scope,
            schedule,
            workspace,
            owner,
        }
    }

    pub fn id(&self) -> ReminderId {
        self.id
    }

    pub fn reminder_time(&self) -> DateTime<Utc> {
        self.reminder_time
    }

    pub fn is_sent(&self) -> bool {
        self.is_sent
    }

    pub fn scope(&self) -> ReminderScope {
        self.scope
    }

    pub fn schedule(&self) -> &ScheduleSummary {
        &self.schedule
    }

    pub fn workspace(&self) -> &WorkspaceSummary {
        &self.workspace
    }

    /// リマインダーを設定したユーザー（`only me` スコープの宛先）
    pub fn owner(&self) -> &Recipient {
        &self.owner
    }

    /// `now` 時点で配信対象か
    ///
    /// → [`eligibility::is_due_within`]
    pub fn is_due(&self, now: DateTime<Utc>, lookback: TimeDelta) -> bool {
        eligibility::is_due_within(now, self.reminder_time, self.is_sent, lookback)
    }

    /// 送信済みにする
    pub fn mark_sent(&mut self) {
        self.is_sent = true;
    }
}
