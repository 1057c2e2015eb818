//! # ジョブランナー
//!
//! 各ジョブを独立した tokio タスクとして一定間隔で実行する。
//!
//! - 最初のサイクルは起動直後に実行する
//! - サイクルはループ内で await するため、同じジョブが重なって実行されることはない
//! - サイクルが間隔より長引いた場合、取りこぼした tick はスキップする
//! - 異なるジョブは並行に動く

use std::{sync::Arc, time::Duration};

use timewise_shared::event_log::error;
use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::Instrument;

use crate::usecase::{CycleReport, Job};

/// 起動中のジョブを保持するランナー
#[derive(Default)]
pub struct Scheduler {
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// `job` を `period` 間隔で実行するタスクを起動する
    pub fn spawn(&mut self, job: Arc<dyn Job>, period: Duration) {
        let name = job.name();
        tracing::info!(job = name, period_secs = period.as_secs(), "ジョブを登録");

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                run_once(job.as_ref())
                    .instrument(tracing::info_span!("job", job = name))
                    .await;
            }
        });

        self.handles.push((name, handle));
    }

    /// 起動中のジョブ数
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// すべてのジョブを停止する（以降の tick は実行されない）
    pub fn shutdown(self) {
        for (name, handle) in self.handles {
            handle.abort();
            tracing::info!(job = name, "ジョブを停止");
        }
    }
}

/// ジョブを 1 サイクル実行し、結果をログに出す
///
/// サイクルの失敗はログに残すだけで、次の tick で再実行される。
pub async fn run_once(job: &dyn Job) -> Option<CycleReport> {
    match job.run_cycle().await {
        Ok(report) => {
            if report.due > 0 {
                tracing::info!(
                    candidates = report.candidates,
                    due = report.due,
                    delivered = report.delivered,
                    failed = report.failed,
                    "サイクル完了"
                );
            } else {
                tracing::debug!(candidates = report.candidates, "配信対象なし");
            }
            Some(report)
        }
        Err(e) => {
            tracing::error!(
                error.category = error::category::EXTERNAL_SERVICE,
                error.kind = error::kind::DATA_SERVICE,
                error = %e,
                "サイクルを中断"
            );
            None
        }
    }
}
