//! DataServiceClient スーパートレイトとクライアント実装の構造体

use std::time::Duration;

use super::{
    maintenance_client::MaintenanceClient,
    notification_client::NotificationClient,
    reminder_client::ReminderClient,
};
use crate::error::InfraError;

/// データサービスクライアントトレイト（スーパートレイト）
///
/// Reminder / Notification / Maintenance の各サブトレイトを束ねる。
/// 各ジョブは必要なサブトレイトだけに依存できる。
pub trait DataServiceClient: ReminderClient + NotificationClient + MaintenanceClient {}

/// ブランケット impl: 3 つのサブトレイトをすべて実装する型は
/// 自動的に `DataServiceClient` を実装する。
impl<T> DataServiceClient for T where T: ReminderClient + NotificationClient + MaintenanceClient {}

/// データサービスクライアント実装
#[derive(Clone)]
pub struct HttpDataServiceClient {
    pub(super) base_url: String,
    pub(super) client:   reqwest::Client,
}

impl HttpDataServiceClient {
    /// 新しいクライアントを作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: データサービスのベース URL（例: `https://dms.timewise.space/dbms/v1`）
    /// - `timeout`: 1 リクエストあたりのタイムアウト
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, InfraError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
