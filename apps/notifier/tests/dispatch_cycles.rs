//! リマインダー / 通知サイクルを送信元ローテーション込みで通した結合テスト

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
use pretty_assertions::assert_eq;
use timewise_domain::{
    clock::FixedClock,
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
    sender::{SenderCredential, SenderPool},
};
use timewise_infra::{
    mail::RotatingMailer,
    mock::{MockDataServiceClient, MockMailTransport},
};
use timewise_notifier::usecase::{Job, NotificationCycle, ReminderCycle, TemplateRenderer};

fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
}

fn identity(index: usize) -> String {
    format!("sender{index}@example.com")
}

fn pool(size: usize) -> SenderPool {
    SenderPool::new(
        (0..size)
            .map(|i| SenderCredential::new("smtp.example.com", 587, identity(i), "secret"))
            .collect(),
    )
    .unwrap()
}

fn reminder(id: i64, scope: ReminderScope) -> Reminder {
    Reminder::new(
        ReminderId::new(id),
        at(10, 0, 0),
        false,
        scope,
        ScheduleSummary {
            id:          ScheduleId::new(id * 10),
            title:       "Planning".to_string(),
            description: "Quarterly planning".to_string(),
            start_time:  Some(at(10, 30, 0)),
            end_time:    Some(at(11, 30, 0)),
        },
        WorkspaceSummary {
            title:       "Timewise".to_string(),
            description: "Core team".to_string(),
        },
        Recipient {
            user_email_id: UserEmailId::new(1),
            email:         "owner@example.com".to_string(),
        },
    )
}

struct Fixture {
    client:    MockDataServiceClient,
    transport: MockMailTransport,
    mailer:    Arc<RotatingMailer<MockMailTransport>>,
    clock:     Arc<FixedClock>,
    renderer:  Arc<TemplateRenderer>,
}

impl Fixture {
    fn new(pool_size: usize, cursor: usize) -> Self {
        let transport = MockMailTransport::new();
        Self {
            client: MockDataServiceClient::new(),
            mailer: Arc::new(RotatingMailer::with_cursor(
                transport.clone(),
                pool(pool_size),
                cursor,
            )),
            transport,
            clock: Arc::new(FixedClock::new(at(10, 1, 30))),
            renderer: Arc::new(TemplateRenderer::new(FixedOffset::east_opt(7 * 3600).unwrap()).unwrap()),
        }
    }

    fn reminder_cycle(&self) -> ReminderCycle {
        ReminderCycle::new(
            Arc::new(self.client.clone()),
            self.mailer.clone(),
            self.renderer.clone(),
            self.clock.clone(),
            TimeDelta::minutes(2),
        )
    }

    fn notification_cycle(&self) -> NotificationCycle {
        NotificationCycle::new(
            Arc::new(self.client.clone()),
            self.mailer.clone(),
            self.renderer.clone(),
            self.clock.clone(),
        )
    }
}

#[tokio::test]
async fn test_送信済みにしたリマインダーは次のサイクルで再送しない() {
    let fixture = Fixture::new(2, 0);
    fixture.client.add_reminder(reminder(1, ReminderScope::OnlyMe));
    let sut = fixture.reminder_cycle();

    let first = sut.run_cycle().await.unwrap();
    fixture.clock.advance(TimeDelta::seconds(10));
    let second = sut.run_cycle().await.unwrap();

    assert_eq!(first.delivered, 1);
    assert_eq!(second.due, 0);
    assert_eq!(fixture.transport.delivered().len(), 1);
    assert_eq!(fixture.client.marked_reminders(), vec![ReminderId::new(1)]);
    assert!(fixture.client.reminders()[0].is_sent());
}

#[tokio::test]
async fn test_リマインダーメールは表示用タイムゾーンの時刻を含む() {
    let fixture = Fixture::new(1, 0);
    fixture.client.add_reminder(reminder(1, ReminderScope::OnlyMe));

    fixture.reminder_cycle().run_cycle().await.unwrap();

    let (_, email) = &fixture.transport.delivered()[0];
    assert!(email.text_body.contains("Start Time: 01/01/2024 17:30"));
    assert!(email.text_body.contains("End Time: 01/01/2024 18:30"));
    assert_eq!(
        fixture.client.created_notifications()[0].message,
        "Schedule Planning is about to start at 17:30 on 01/01/2024"
    );
}

#[tokio::test]
async fn test_参加者全員宛てはローテーションしながら参加者ごとに届ける() {
    let fixture = Fixture::new(3, 0);
    fixture.transport.fail_for(identity(0));
    fixture.client.add_reminder(reminder(2, ReminderScope::AllParticipants));
    fixture.client.set_participants(
        ScheduleId::new(20),
        vec![
            Participant {
                email:   "a@example.com".to_string(),
                user_id: UserEmailId::new(7),
            },
            Participant {
                email:   "b@example.com".to_string(),
                user_id: UserEmailId::new(8),
            },
        ],
    );

    fixture.reminder_cycle().run_cycle().await.unwrap();

    // 1 通目で送信元 0 → 1 に切り替わり、2 通目は送信元 1 から始まる
    assert_eq!(
        fixture.transport.attempted_identities(),
        vec![identity(0), identity(1), identity(1)]
    );
    let delivered: Vec<String> = fixture
        .transport
        .delivered()
        .into_iter()
        .map(|(_, email)| email.to)
        .collect();
    assert_eq!(delivered, vec!["a@example.com", "b@example.com"]);
    assert_eq!(fixture.client.created_notifications().len(), 2);
    assert_eq!(fixture.mailer.cursor().await, 1);
}

#[tokio::test]
async fn test_送信元が全滅したリマインダーは未送信のまま残り復旧後に配信される() {
    let fixture = Fixture::new(3, 1);
    for i in 0..3 {
        fixture.transport.fail_for(identity(i));
    }
    fixture.client.add_reminder(reminder(1, ReminderScope::OnlyMe));
    let sut = fixture.reminder_cycle();

    let first = sut.run_cycle().await.unwrap();

    assert_eq!(first.failed, 1);
    assert_eq!(fixture.transport.attempted_identities().len(), 3);
    assert_eq!(fixture.mailer.cursor().await, 1);
    assert!(!fixture.client.reminders()[0].is_sent());
    assert!(fixture.client.created_notifications().is_empty());

    fixture.transport.succeed_for(&identity(2));
    fixture.clock.advance(TimeDelta::seconds(10));
    let second = sut.run_cycle().await.unwrap();

    assert_eq!(second.delivered, 1);
    assert_eq!(fixture.mailer.cursor().await, 2);
    assert!(fixture.client.reminders()[0].is_sent());
}

#[tokio::test]
async fn test_時間窓を過ぎた未送信リマインダーは送らない() {
    let fixture = Fixture::new(1, 0);
    fixture.client.add_reminder(reminder(1, ReminderScope::OnlyMe));
    fixture.clock.advance(TimeDelta::seconds(30));

    // now = 10:02:00 → 窓は (10:00:00, 10:02:00]
    let report = fixture.reminder_cycle().run_cycle().await.unwrap();

    assert_eq!(report.due, 0);
    assert!(fixture.transport.attempted_identities().is_empty());
}

#[tokio::test]
async fn test_8件の送信元でカーソル5から5件失敗すると6回目の送信元2で通知が届く() {
    let fixture = Fixture::new(8, 5);
    for i in [5, 6, 7, 0, 1] {
        fixture.transport.fail_for(identity(i));
    }
    fixture.client.add_notification(Notification {
        id:              NotificationId::new(1),
        notified_at:     Some(at(10, 0, 0)),
        is_sent:         false,
        recipient_email: "member@example.com".to_string(),
        message:         "Schedule Planning is about to start".to_string(),
    });

    let report = fixture.notification_cycle().run_cycle().await.unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(fixture.transport.attempted_identities().len(), 6);
    assert_eq!(fixture.transport.delivered()[0].0, identity(2));
    assert_eq!(fixture.mailer.cursor().await, 2);
    assert_eq!(
        fixture.client.marked_notifications(),
        vec![NotificationId::new(1)]
    );
}

#[tokio::test]
async fn test_通知とリマインダーのサイクルは同じカーソルを共有する() {
    let fixture = Fixture::new(2, 0);
    fixture.transport.fail_for(identity(0));
    fixture.client.add_reminder(reminder(1, ReminderScope::OnlyMe));
    fixture.client.add_notification(Notification {
        id:              NotificationId::new(1),
        notified_at:     Some(at(9, 0, 0)),
        is_sent:         false,
        recipient_email: "member@example.com".to_string(),
        message:         "hello".to_string(),
    });
    let reminders = fixture.reminder_cycle();
    let notifications = fixture.notification_cycle();

    let (r, n) = tokio::join!(reminders.run_cycle(), notifications.run_cycle());

    assert_eq!(r.unwrap().delivered, 1);
    assert_eq!(n.unwrap().delivered, 1);
    // 最初の送信で 0 → 1 に切り替わり、もう一方は 1 から始まる
    assert_eq!(
        fixture.transport.attempted_identities(),
        vec![identity(0), identity(1), identity(1)]
    );
}
