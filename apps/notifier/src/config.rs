//! # Notifier 設定
//!
//! 環境変数から通知ディスパッチャの設定を読み込む。
//!
//! 読み込みは [`NotifierConfig::from_lookup`] に集約し、環境変数へのアクセスは
//! 引数の関数に閉じ込める。テストでは `HashMap` から値を渡す。

use std::{env, str::FromStr, time::Duration};

use chrono::{FixedOffset, TimeDelta};
use thiserror::Error;
use timewise_domain::sender::{SenderCredential, SenderPool};

/// データサービスの既定ベース URL
pub const DEFAULT_DATA_SERVICE_URL: &str = "https://dms.timewise.space/dbms/v1";

/// 設定エラー
///
/// 起動時にのみ発生し、プロセスを停止させる唯一のエラー。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} が設定されていません")]
    Missing { name: &'static str },

    #[error("{name} の値が不正です（{value}）: {reason}")]
    Invalid {
        name:   &'static str,
        value:  String,
        reason: String,
    },
}

/// 通知ディスパッチャの設定
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub data_service:   DataServiceConfig,
    pub schedule:       ScheduleConfig,
    pub mail:           MailConfig,
    /// メール本文に表示する時刻のタイムゾーン
    pub display_offset: FixedOffset,
}

/// データサービス接続の設定
#[derive(Debug, Clone)]
pub struct DataServiceConfig {
    /// ベース URL（`DATA_SERVICE_URL`）
    pub base_url: String,
    /// 1 リクエストあたりのタイムアウト（`DATA_SERVICE_TIMEOUT_SECS`）
    pub timeout:  Duration,
}

/// ジョブの実行間隔と時間窓
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub notification_interval: Duration,
    pub reminder_interval:     Duration,
    pub cleanup_interval:      Duration,
    /// リマインダーの遡り幅（`REMINDER_LOOKBACK_SECS`）
    pub reminder_lookback:     TimeDelta,
}

/// メール送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MailBackend {
    Smtp,
    Noop,
}

/// メール送信の設定
///
/// `MAIL_BACKEND` 環境変数で送信バックエンドを切り替える:
/// - `smtp`: `SMTP_SENDERS` の送信元プールをローテーションしながら送信
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone)]
pub enum MailConfig {
    Smtp {
        pool:    SenderPool,
        /// 1 回の送信試行のタイムアウト（`SMTP_TIMEOUT_SECS`）
        ///
        /// 送信元ローテーションはこの時間 × 送信元数だけ他のジョブの送信を待たせうる。
        timeout: Duration,
    },
    Noop,
}

impl NotifierConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 名前から値を引く関数を使って設定を読み込む
    ///
    /// 空文字列の値は未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let data_service = DataServiceConfig {
            base_url: get("DATA_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_DATA_SERVICE_URL.to_string()),
            timeout:  secs("DATA_SERVICE_TIMEOUT_SECS", get("DATA_SERVICE_TIMEOUT_SECS"), 30)?,
        };

        let schedule = ScheduleConfig {
            notification_interval: secs(
                "NOTIFICATION_INTERVAL_SECS",
                get("NOTIFICATION_INTERVAL_SECS"),
                5,
            )?,
            reminder_interval:     secs(
                "REMINDER_INTERVAL_SECS",
                get("REMINDER_INTERVAL_SECS"),
                10,
            )?,
            cleanup_interval:      secs("CLEANUP_INTERVAL_SECS", get("CLEANUP_INTERVAL_SECS"), 60)?,
            reminder_lookback:     lookback(get("REMINDER_LOOKBACK_SECS"))?,
        };

        let mail = match parse_mail_backend(get("MAIL_BACKEND"))? {
            MailBackend::Smtp => MailConfig::Smtp {
                pool:    parse_senders(get("SMTP_SENDERS"))?,
                timeout: secs("SMTP_TIMEOUT_SECS", get("SMTP_TIMEOUT_SECS"), 30)?,
            },
            MailBackend::Noop => MailConfig::Noop,
        };

        Ok(Self {
            data_service,
            schedule,
            mail,
            display_offset: parse_display_offset(get("DISPLAY_UTC_OFFSET_HOURS"))?,
        })
    }
}

/// 正の秒数をパースする（未設定なら `default`）
fn parse_positive_secs(
    name: &'static str,
    raw: Option<String>,
    default: u64,
) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => Err(invalid(name, &raw, "0 より大きい値が必要です")),
        Ok(value) => Ok(value),
        Err(e) => Err(invalid(name, &raw, e)),
    }
}

fn secs(name: &'static str, raw: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    parse_positive_secs(name, raw, default).map(Duration::from_secs)
}

/// リマインダーの遡り幅の上限（1 日）
const MAX_LOOKBACK_SECS: u64 = 24 * 60 * 60;

fn lookback(raw: Option<String>) -> Result<TimeDelta, ConfigError> {
    const NAME: &str = "REMINDER_LOOKBACK_SECS";

    let value = parse_positive_secs(NAME, raw.clone(), 120)?;
    if value > MAX_LOOKBACK_SECS {
        return Err(invalid(
            NAME,
            &raw.unwrap_or_default(),
            format!("{MAX_LOOKBACK_SECS} 秒以下を指定してください"),
        ));
    }

    i64::try_from(value)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(|| invalid(NAME, &raw.unwrap_or_default(), "値が大きすぎます"))
}

fn parse_mail_backend(raw: Option<String>) -> Result<MailBackend, ConfigError> {
    let Some(raw) = raw else {
        return Ok(MailBackend::Smtp);
    };

    MailBackend::from_str(raw.trim())
        .map_err(|_| invalid("MAIL_BACKEND", &raw, "smtp または noop を指定してください"))
}

/// `SMTP_SENDERS`（`{host, port, identity, secret}` の JSON 配列）をパースする
fn parse_senders(raw: Option<String>) -> Result<SenderPool, ConfigError> {
    const NAME: &str = "SMTP_SENDERS";

    let raw = raw.ok_or(ConfigError::Missing { name: NAME })?;
    let credentials: Vec<SenderCredential> = serde_json::from_str(&raw)
        // 値にはシークレットが含まれるため、エラーメッセージには載せない
        .map_err(|e| invalid(NAME, "<redacted>", e))?;

    SenderPool::new(credentials).map_err(|e| invalid(NAME, "<redacted>", e))
}

fn parse_display_offset(raw: Option<String>) -> Result<FixedOffset, ConfigError> {
    const NAME: &str = "DISPLAY_UTC_OFFSET_HOURS";

    let hours = match &raw {
        Some(value) => value
            .trim()
            .parse::<i32>()
            .map_err(|e| invalid(NAME, value, e))?,
        None => 7,
    };

    Some(hours)
        .filter(|hours| (-23..=23).contains(hours))
        .and_then(|hours| FixedOffset::east_opt(hours * 3600))
        .ok_or_else(|| invalid(NAME, &hours.to_string(), "-23 から 23 の範囲で指定してください"))
}

fn invalid(name: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
