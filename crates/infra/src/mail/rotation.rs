//! # 送信元ローテーション
//!
//! 送信元プールを巡回してメールを届ける [`Mailer`] 実装。
//!
//! ## アルゴリズム
//!
//! 1. カーソル位置の送信元で送信する
//! 2. 成功したら即座に返す（カーソルは動かさない）
//! 3. 失敗したらカーソルを `(cursor + 1) % N` に進めて再試行する
//! 4. 1 回の呼び出しで最大 `N` 回試行し、全滅なら [`DeliveryError::PoolExhausted`]
//!
//! カーソルは呼び出しをまたいで保持される。次の呼び出しは前回止まった位置から始まる。
//! バックオフやサーキットブレーカーは持たない。失敗した送信元も、カーソルが一周すれば再び試す。

use async_trait::async_trait;
use timewise_domain::{
    mail::{DeliveryError, EmailMessage},
    sender::SenderPool,
};
use timewise_shared::{
    event_log::{error, event},
    log_business_event,
};
use tokio::sync::Mutex;

use super::{MailTransport, Mailer};

/// 送信元ローテーション付きメーラー
///
/// カーソルは `send` の間ロックされ続ける。並行するジョブからの送信は
/// ここで直列化される。
///
/// ロックは SMTP の送受信中も保持されるため、全送信元が失敗する `send` は
/// 他のジョブの送信を最大で「送信元数 × 1 回あたりのタイムアウト」待たせる
/// （送信元 8 件、タイムアウト 30 秒なら 240 秒）。
pub struct RotatingMailer<T> {
    transport: T,
    pool:      SenderPool,
    cursor:    Mutex<usize>,
}

impl<T: MailTransport> RotatingMailer<T> {
    /// カーソル 0 から開始するメーラーを作成する
    pub fn new(transport: T, pool: SenderPool) -> Self {
        Self::with_cursor(transport, pool, 0)
    }

    /// 指定したカーソル位置から開始するメーラーを作成する
    ///
    /// `cursor` はプール長で剰余を取る。
    pub fn with_cursor(transport: T, pool: SenderPool, cursor: usize) -> Self {
        let cursor = cursor % pool.len();
        Self {
            transport,
            pool,
            cursor: Mutex::new(cursor),
        }
    }

    /// 現在のカーソル位置
    pub async fn cursor(&self) -> usize {
        *self.cursor.lock().await
    }
}

#[async_trait]
impl<T: MailTransport> Mailer for RotatingMailer<T> {
    async fn send(&self, email: &EmailMessage) -> Result<(), DeliveryError> {
        let mut cursor = self.cursor.lock().await;
        let attempts = self.pool.len();
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            let credential = self.pool.get(*cursor);

            match self.transport.send_mail(credential, email).await {
                Ok(()) => {
                    tracing::debug!(
                        sender = %credential.identity,
                        attempt,
                        to = %email.to,
                        "メール送信成功"
                    );
                    return Ok(());
                }
                Err(e) => {
                    let next = (*cursor + 1) % attempts;
                    tracing::warn!(
                        error.category = error::category::EXTERNAL_SERVICE,
                        error.kind = error::kind::SMTP,
                        error = %e,
                        sender = %credential.identity,
                        attempt,
                        "送信元での送信に失敗"
                    );
                    log_business_event!(
                        event.category = event::category::MAIL,
                        event.action = event::action::SENDER_ROTATED,
                        event.entity_type = event::entity_type::SENDER_CREDENTIAL,
                        event.entity_id = %credential.identity,
                        event.result = event::result::FAILURE,
                        rotation.from = *cursor,
                        rotation.to = next,
                        "次の送信元に切り替え"
                    );
                    *cursor = next;
                    last_error = e.to_string();
                }
            }
        }

        log_business_event!(
            event.category = event::category::MAIL,
            event.action = event::action::POOL_EXHAUSTED,
            event.result = event::result::FAILURE,
            attempts,
            to = %email.to,
            error = %last_error,
            "全送信元で送信に失敗"
        );

        Err(DeliveryError::PoolExhausted {
            attempts,
            last_error,
        })
    }
}
