//! # データサービスクライアント
//!
//! リマインダー・通知・スケジュール参加者を保持するデータサービスとの通信を担当する。
//! このプロセスはレコードを作成・削除せず、送信済みフラグの更新と
//! フォローアップ通知の作成のみを行う。
//!
//! ## エンドポイント
//!
//! - `GET /reminder` - リマインダー一覧
//! - `PUT /reminder/{id}/is_sent` - リマインダーを送信済みにする
//! - `GET /schedule_participant/schedule/{id}` - スケジュール参加者一覧
//! - `GET /notification` - 通知一覧
//! - `PUT /notification/{id}` - 通知を送信済みにする
//! - `POST /notification` - フォローアップ通知を作成
//! - `GET /user_email/clear-expired` - 期限切れリンク要求の削除

mod client_impl;
mod maintenance_client;
mod notification_client;
mod reminder_client;
mod response;
pub mod types;

pub use client_impl::{DataServiceClient, HttpDataServiceClient};
pub use maintenance_client::MaintenanceClient;
pub use notification_client::NotificationClient;
pub use reminder_client::ReminderClient;
