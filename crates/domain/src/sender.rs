//! # 送信元クレデンシャル
//!
//! メール送信に使う送信元アカウント（ホスト・ポート・ID・シークレット）と、
//! その順序付きプールを定義する。
//!
//! ## 設計方針
//!
//! - **不変**: プロセス起動時に一度だけ読み込み、以降は変更しない
//! - **空のプールは作れない**: [`SenderPool::new`] で検証する
//! - **シークレットを漏らさない**: `Debug` 出力ではシークレットを伏せる

use std::fmt;

use serde::Deserialize;

use crate::DomainError;

/// 送信元クレデンシャル
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct SenderCredential {
    pub host:     String,
    pub port:     u16,
    /// 認証 ID（送信元アドレスを兼ねる）
    pub identity: String,
    pub secret:   String,
}

impl SenderCredential {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        identity: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            identity: identity.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for SenderCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenderCredential")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("identity", &self.identity)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// 送信元プール
///
/// 順序付きで、少なくとも 1 件のクレデンシャルを持つ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderPool(Vec<SenderCredential>);

impl SenderPool {
    /// プールを作成する
    ///
    /// 空のリスト、ホスト / ID が空のクレデンシャル、ポート 0 は拒否する。
    pub fn new(credentials: Vec<SenderCredential>) -> Result<Self, DomainError> {
        if credentials.is_empty() {
            return Err(DomainError::Validation(
                "送信元プールには 1 件以上のクレデンシャルが必要です".to_string(),
            ));
        }

        for (index, credential) in credentials.iter().enumerate() {
            if credential.host.trim().is_empty() {
                return Err(DomainError::Validation(format!(
                    "送信元 #{index} のホストが空です"
                )));
            }
            if credential.identity.trim().is_empty() {
                return Err(DomainError::Validation(format!(
                    "送信元 #{index} の ID が空です"
                )));
            }
            if credential.port == 0 {
                return Err(DomainError::Validation(format!(
                    "送信元 #{index} のポート番号が不正です"
                )));
            }
        }

        Ok(Self(credentials))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 常に false（空のプールは作れない）
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `index` 番目のクレデンシャル
    ///
    /// `index` はプール長で剰余を取ってから参照する。
    pub fn get(&self, index: usize) -> &SenderCredential {
        &self.0[index % self.0.len()]
    }
}
