//! # 配信可否の判定
//!
//! リマインダー / 通知レコードが「今配信すべきか」を決める純粋関数群。
//!
//! ## 判定ルール
//!
//! | 対象 | ルール | 関数 |
//! |------|--------|------|
//! | リマインダー | `now - lookback < due_at <= now` | [`is_due_within`] |
//! | 通知 | `due_at <= now`（下限なし） | [`is_due_by`] |
//!
//! どちらも送信済み（`sent == true`）なら常に対象外。二重送信の防止は
//! 時間窓ではなく送信済みフラグが担う。2 つのルールは統一しない。
//!
//! ## 秒単位への丸め
//!
//! 比較前に `now` と `due_at` の両方を秒未満切り捨てで丸める
//! （`YYYY-MM-DD HH:MM:SS` 粒度）。

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};

/// 秒未満を切り捨てる
pub fn truncate_to_seconds(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(0)
}

/// 時間窓ルールで配信対象かを判定する（リマインダー用）
///
/// `sent == false` かつ `due_at` が半開区間 `(now - lookback, now]` に入るとき true。
/// `now - lookback` が表現可能な範囲を超える場合は下限なしとして扱う。
pub fn is_due_within(
    now: DateTime<Utc>,
    due_at: DateTime<Utc>,
    sent: bool,
    lookback: TimeDelta,
) -> bool {
    if sent {
        return false;
    }

    let now = truncate_to_seconds(now);
    let due_at = truncate_to_seconds(due_at);
    let after_window_start = now
        .checked_sub_signed(lookback)
        .is_none_or(|window_start| due_at > window_start);

    after_window_start && due_at <= now
}

/// 期限到来ルールで配信対象かを判定する（通知用）
///
/// `sent == false` かつ `due_at` が設定済みで `due_at <= now` のとき true。
/// 送信予定時刻が未設定の通知は送らない。
pub fn is_due_by(now: DateTime<Utc>, due_at: Option<DateTime<Utc>>, sent: bool) -> bool {
    if sent {
        return false;
    }

    due_at.is_some_and(|due_at| truncate_to_seconds(due_at) <= truncate_to_seconds(now))
}
