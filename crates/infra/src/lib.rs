//! # Timewise インフラ層
//!
//! 外部システムとの接続を担当する。
//!
//! - [`data_service`]: リマインダー・通知レコードを保持するデータサービスの HTTP クライアント
//! - [`mail`]: SMTP によるメール送信と送信元ローテーション
//! - `mock`: テスト用のインメモリ実装（`test-utils` feature）

pub mod data_service;
pub mod error;
pub mod mail;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::{InfraError, InfraErrorKind};
