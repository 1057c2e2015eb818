//! # ユースケース
//!
//! 3 つの定期ジョブ（通知・リマインダー・期限切れリンク削除）の 1 サイクル分の処理。
//!
//! 各サイクルは「候補を取得 → 配信可否を判定 → レンダリング → 配信 → 送信済みマーク」を行う。
//! 候補 1 件の失敗はログに残してサイクルを続行し、次のサイクルで再試行される。
//! サイクル全体が中断するのは候補一覧の取得に失敗したときだけ。

mod cleanup;
mod notification;
mod reminder;
mod template_renderer;

use async_trait::async_trait;
pub use cleanup::CleanupCycle;
pub use notification::NotificationCycle;
pub use reminder::ReminderCycle;
pub use template_renderer::TemplateRenderer;
use thiserror::Error;
use timewise_infra::InfraError;

/// サイクル結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// 取得したレコード数
    pub candidates: usize,
    /// 配信対象と判定したレコード数
    pub due:        usize,
    /// 配信して送信済みにしたレコード数
    pub delivered:  usize,
    /// 配信対象だったが送信済みにできなかったレコード数
    pub failed:     usize,
}

/// サイクルを中断するエラー
#[derive(Debug, Error)]
pub enum CycleError {
    /// 候補一覧の取得に失敗した
    #[error("データサービスを利用できません: {0}")]
    CollaboratorUnavailable(#[from] InfraError),
}

/// 定期ジョブ
#[async_trait]
pub trait Job: Send + Sync {
    /// ログに出すジョブ名
    fn name(&self) -> &'static str;

    /// 1 サイクル分の処理を行う
    async fn run_cycle(&self) -> Result<CycleReport, CycleError>;
}
