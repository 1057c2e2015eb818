//! Noop 送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! 開発環境や配信無効化時に使用する。

use async_trait::async_trait;
use timewise_domain::mail::{DeliveryError, EmailMessage};

use super::Mailer;

/// Noop 送信（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, email: &EmailMessage) -> Result<(), DeliveryError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "Noop: メール送信をスキップ"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sendがエラーを返さない() {
        let email = EmailMessage {
            to:        "test@example.com".to_string(),
            subject:   "Notification".to_string(),
            html_body: "<p>テスト</p>".to_string(),
            text_body: "テスト".to_string(),
        };

        let result = NoopMailer.send(&email).await;

        assert!(result.is_ok());
    }
}
