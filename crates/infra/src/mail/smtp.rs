//! SMTP 送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 送信元ごとにホスト・認証情報が異なるため、試行のたびにトランスポートを組み立てる。

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use timewise_domain::{
    mail::{DeliveryError, EmailMessage},
    sender::SenderCredential,
};

use super::MailTransport;

/// SMTP 送信
///
/// STARTTLS リレーにユーザー名 / パスワード認証で接続する。
#[derive(Debug, Clone)]
pub struct SmtpMailTransport {
    timeout: Duration,
}

impl SmtpMailTransport {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `timeout`: 1 回の送信試行のタイムアウト
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn build_message(
        credential: &SenderCredential,
        email: &EmailMessage,
    ) -> Result<Message, DeliveryError> {
        let from: Mailbox = credential
            .identity
            .parse()
            .map_err(|e| DeliveryError::InvalidMessage(format!("送信元アドレス不正: {e}")))?;
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| DeliveryError::InvalidMessage(format!("宛先アドレス不正: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(&email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| DeliveryError::InvalidMessage(format!("メッセージ構築失敗: {e}")))
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send_mail(
        &self,
        credential: &SenderCredential,
        email: &EmailMessage,
    ) -> Result<(), DeliveryError> {
        let message = Self::build_message(credential, email)?;

        let transport_failed = |reason: String| DeliveryError::TransportFailed {
            identity: credential.identity.clone(),
            reason,
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&credential.host)
            .map_err(|e| transport_failed(format!("SMTP リレー設定失敗: {e}")))?
            .port(credential.port)
            .credentials(Credentials::new(
                credential.identity.clone(),
                credential.secret.clone(),
            ))
            .timeout(Some(self.timeout))
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| transport_failed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }
}
