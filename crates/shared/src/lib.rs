//! # Timewise 共有ユーティリティ
//!
//! notifier と infra から共通で利用されるユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - 外部クレートへの依存は最小限に抑える（トレーシング初期化は `observability` feature の背後）

pub mod event_log;
pub mod observability;
