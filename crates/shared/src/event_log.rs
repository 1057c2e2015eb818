//! # ビジネスイベントログとエラーコンテキストの構造化ヘルパー
//!
//! 配信結果を `jq` で追跡できるよう、ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## エラーコンテキスト
//!
//! `tracing::error!` / `tracing::warn!` に `error.category` + `error.kind` を直接追加する。
//! 定数は [`error`] モジュールで提供。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`error.kind`）を使用する。JSON 出力ではフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、`tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: [`event::category`] の定数
/// - `event.action`: [`event::action`] の定数
/// - `event.result`: [`event::result`] の定数
///
/// ## 推奨フィールド
///
/// - `event.entity_type`: [`event::entity_type`] の定数
/// - `event.entity_id`: レコード ID
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const REMINDER: &str = "reminder";
        pub const NOTIFICATION: &str = "notification";
        pub const MAIL: &str = "mail";
        pub const MAINTENANCE: &str = "maintenance";
    }

    /// イベントアクション
    pub mod action {
        // リマインダー
        pub const REMINDER_SENT: &str = "reminder.sent";
        pub const REMINDER_FAILED: &str = "reminder.failed";
        pub const FOLLOW_UP_CREATED: &str = "reminder.follow_up_created";

        // 通知
        pub const NOTIFICATION_SENT: &str = "notification.sent";
        pub const NOTIFICATION_FAILED: &str = "notification.failed";

        // 送信元プール
        pub const SENDER_ROTATED: &str = "mail.sender_rotated";
        pub const POOL_EXHAUSTED: &str = "mail.pool_exhausted";

        // メンテナンス
        pub const EXPIRED_LINKS_CLEARED: &str = "maintenance.expired_links_cleared";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const REMINDER: &str = "reminder";
        pub const NOTIFICATION: &str = "notification";
        pub const SENDER_CREDENTIAL: &str = "sender_credential";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// 外部サービス呼び出し（データサービス、SMTP サーバー）
        pub const EXTERNAL_SERVICE: &str = "external_service";
        /// プロセス内部（テンプレート等）
        pub const INTERNAL: &str = "internal";
    }

    /// エラー種別
    pub mod kind {
        pub const DATA_SERVICE: &str = "data_service";
        pub const SMTP: &str = "smtp";
        pub const TEMPLATE: &str = "template";
    }
}
