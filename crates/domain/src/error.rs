//! # ドメイン層エラー定義
//!
//! ドメインの不変条件違反を表現するエラー型。
//! 配信時のエラーは [`crate::mail::DeliveryError`] で別に扱う。

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 値オブジェクトの生成時に不変条件を満たさない入力を受け取った場合に使用する。
    ///
    /// # 例
    ///
    /// - 空の送信元プール
    /// - ポート番号 0 のクレデンシャル
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
