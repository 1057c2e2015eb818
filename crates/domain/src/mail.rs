//! # メール
//!
//! 配信するメールメッセージと、配信時に発生するエラーを定義する。
//!
//! ## エラー分類
//!
//! | バリアント | 意味 | 回復方法 |
//! |-----------|------|---------|
//! | [`DeliveryError::TransportFailed`] | 1 つの送信元で送信失敗 | 次の送信元にローテーション |
//! | [`DeliveryError::InvalidMessage`] | メッセージを構築できない | 同上（試行 1 回分の失敗として扱う） |
//! | [`DeliveryError::PoolExhausted`] | 全送信元で送信失敗 | レコードを未送信のまま次サイクルで再試行 |
//! | [`DeliveryError::TemplateFailed`] | テンプレートのレンダリング失敗 | レコードをスキップ |

use thiserror::Error;

/// メールメッセージ
///
/// テンプレートレンダリングの出力。送信元は配信時に選ばれるため持たない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:        String,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

impl EmailMessage {
    /// 宛先だけを差し替えたコピーを返す
    ///
    /// 参加者全員宛てのリマインダーで、同じ本文を宛先ごとに送るために使う。
    pub fn with_recipient(&self, to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            ..self.clone()
        }
    }
}

/// 配信エラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// 1 つの送信元での接続・送信に失敗
    #[error("送信元 {identity} での送信に失敗: {reason}")]
    TransportFailed { identity: String, reason: String },

    /// メッセージの構築に失敗（アドレス不正など）
    #[error("メッセージ構築に失敗: {0}")]
    InvalidMessage(String),

    /// 送信元プールの全クレデンシャルで失敗
    #[error("全送信元（{attempts} 件）で送信に失敗: {last_error}")]
    PoolExhausted { attempts: usize, last_error: String },

    /// テンプレートのレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_recipientは宛先のみ差し替える() {
        let original = EmailMessage {
            to:        "owner@example.com".to_string(),
            subject:   "Reminder".to_string(),
            html_body: "<p>hi</p>".to_string(),
            text_body: "hi".to_string(),
        };

        let copy = original.with_recipient("member@example.com");

        assert_eq!(copy.to, "member@example.com");
        assert_eq!(copy.subject, original.subject);
        assert_eq!(copy.html_body, original.html_body);
        assert_eq!(copy.text_body, original.text_body);
    }

    #[test]
    fn test_pool_exhaustedのメッセージに試行回数を含む() {
        let err = DeliveryError::PoolExhausted {
            attempts:   8,
            last_error: "timeout".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains('8'));
        assert!(message.contains("timeout"));
    }
}
