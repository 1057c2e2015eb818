//! # Timewise Notifier ライブラリ
//!
//! 通知ディスパッチャの設定・ユースケース・ジョブランナーを公開する。
//! バイナリ（`main.rs`）と結合テストの両方から利用する。

pub mod config;
pub mod scheduler;
pub mod usecase;
