//! # メール送信
//!
//! メール配信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **2 段の抽象化**: [`MailTransport`] は「1 つの送信元で 1 回送る」、
//!   [`Mailer`] は「どうにかして届ける」を表す
//! - **送信元ローテーション**: [`RotatingMailer`] が送信元プールを巡回して [`Mailer`] を実装する
//! - **環境変数切替**: `MAIL_BACKEND` で SMTP / Noop を選択する

mod noop;
mod rotation;
mod smtp;

use async_trait::async_trait;
pub use noop::NoopMailer;
pub use rotation::RotatingMailer;
pub use smtp::SmtpMailTransport;
use timewise_domain::{
    mail::{DeliveryError, EmailMessage},
    sender::SenderCredential,
};

/// 1 つの送信元クレデンシャルでメールを 1 回送信するトレイト
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// `credential` を使って `email` を送信する
    ///
    /// 失敗時は [`DeliveryError::TransportFailed`] または
    /// [`DeliveryError::InvalidMessage`] を返す。
    async fn send_mail(
        &self,
        credential: &SenderCredential,
        email: &EmailMessage,
    ) -> Result<(), DeliveryError>;
}

/// メール配信トレイト
///
/// 各ジョブはこのトレイト越しにメールを送る。送信元の選択は実装に任せる。
#[async_trait]
pub trait Mailer: Send + Sync {
    /// メールを配信する
    async fn send(&self, email: &EmailMessage) -> Result<(), DeliveryError>;
}
