//! # Timewise Notifier
//!
//! データサービスを定期的にポーリングし、期限を迎えたリマインダーと通知をメールで配信する。
//!
//! ## ジョブ
//!
//! | ジョブ | 既定の間隔 | 内容 |
//! |--------|-----------|------|
//! | notification | 5 秒 | 予定時刻を過ぎた通知を配信 |
//! | reminder | 10 秒 | 時間窓に入ったリマインダーを配信し、フォローアップ通知を作成 |
//! | cleanup | 60 秒 | 期限切れリンク要求を削除 |
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `DATA_SERVICE_URL` | No | データサービスのベース URL |
//! | `MAIL_BACKEND` | No | `smtp`（デフォルト）または `noop` |
//! | `SMTP_SENDERS` | smtp 時 **Yes** | 送信元クレデンシャルの JSON 配列 |
//! | `RUST_LOG` | No | ログフィルタ（デフォルト: `info,timewise=debug`） |
//! | `LOG_FORMAT` | No | `json` または `pretty` |
//!
//! その他の間隔・タイムアウトは [`config`](timewise_notifier::config) を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! MAIL_BACKEND=noop cargo run -p timewise-notifier
//! ```

use std::sync::Arc;

use timewise_domain::clock::{Clock, SystemClock};
use timewise_infra::{
    data_service::{DataServiceClient, HttpDataServiceClient},
    mail::{Mailer, NoopMailer, RotatingMailer, SmtpMailTransport},
};
use timewise_notifier::{
    config::{MailConfig, NotifierConfig},
    scheduler::Scheduler,
    usecase::{CleanupCycle, NotificationCycle, ReminderCycle, TemplateRenderer},
};
use timewise_shared::observability::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    init_tracing(&TracingConfig::from_env("timewise-notifier"));

    // 設定読み込み
    let config = NotifierConfig::from_env()?;

    tracing::info!(
        data_service = %config.data_service.base_url,
        "Timewise Notifier を起動します"
    );

    // 依存コンポーネントを初期化
    let client: Arc<dyn DataServiceClient> = Arc::new(HttpDataServiceClient::new(
        &config.data_service.base_url,
        config.data_service.timeout,
    )?);

    let mailer: Arc<dyn Mailer> = match &config.mail {
        MailConfig::Smtp { pool, timeout } => {
            tracing::info!(senders = pool.len(), "メール送信: SMTP");
            Arc::new(RotatingMailer::new(
                SmtpMailTransport::new(*timeout),
                pool.clone(),
            ))
        }
        MailConfig::Noop => {
            tracing::info!("メール送信: Noop（ログ出力のみ）");
            Arc::new(NoopMailer)
        }
    };

    let renderer = Arc::new(TemplateRenderer::new(config.display_offset)?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // ジョブ起動
    let mut scheduler = Scheduler::new();
    scheduler.spawn(
        Arc::new(NotificationCycle::new(
            client.clone(),
            mailer.clone(),
            renderer.clone(),
            clock.clone(),
        )),
        config.schedule.notification_interval,
    );
    scheduler.spawn(
        Arc::new(ReminderCycle::new(
            client.clone(),
            mailer,
            renderer,
            clock,
            config.schedule.reminder_lookback,
        )),
        config.schedule.reminder_interval,
    );
    scheduler.spawn(
        Arc::new(CleanupCycle::new(client)),
        config.schedule.cleanup_interval,
    );

    tracing::info!(jobs = scheduler.len(), "Timewise Notifier が起動しました");

    tokio::signal::ctrl_c().await?;
    tracing::info!("停止シグナルを受信しました");
    scheduler.shutdown();

    Ok(())
}
