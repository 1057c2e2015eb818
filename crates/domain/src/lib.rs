//! # Timewise ドメイン層
//!
//! 通知ディスパッチャの中核となるドメインモデルと純粋なルールを定義する。
//!
//! ## 設計方針
//!
//! - **I/O を持たない**: データサービスや SMTP への依存は一切持たない
//! - **配信可否の判定はここに集約**: リマインダー / 通知の「今送るべきか」は
//!   [`eligibility`] の純粋関数で決まる
//! - **時刻は注入する**: 現在時刻は [`clock::Clock`] 経由で受け取る
//!
//! ## 依存関係の方向
//!
//! ```text
//! notifier → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`eligibility`] - 配信可否の判定（時間窓・送信済みフラグ）
//! - [`reminder`] - リマインダーレコードと配信スコープ
//! - [`notification`] - 通知レコードとフォローアップ通知
//! - [`sender`] - 送信元クレデンシャルとプール
//! - [`mail`] - メールメッセージと配信エラー
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメインエラー

#[macro_use]
mod macros;

pub mod clock;
pub mod eligibility;
pub mod error;
pub mod mail;
pub mod notification;
pub mod reminder;
pub mod sender;

pub use error::DomainError;
