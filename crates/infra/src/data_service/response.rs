//! データサービスレスポンスの共通ハンドリング

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use timewise_shared::event_log::error;

use crate::error::InfraError;

/// JSON ボディを返すレスポンスの共通ハンドリング
///
/// 成功時はボディを `T` にデシリアライズし、エラー時はステータスコードに応じた
/// [`InfraError`] を返す。
///
/// # 引数
///
/// - `response`: データサービスからの HTTP レスポンス
/// - `not_found_error`: 404 レスポンス時に返すエラー。`None` の場合は
///   `UnexpectedStatus` にフォールスルー
pub(super) async fn handle_json<T: DeserializeOwned>(
    response: reqwest::Response,
    not_found_error: Option<InfraError>,
) -> Result<T, InfraError> {
    let response = check_status(response, not_found_error).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// 一覧レスポンスのハンドリング
///
/// データサービスは 0 件のとき `null` を返すことがあるため、空の一覧として扱う。
/// 要素は 1 件ずつデシリアライズし、変換できない要素はログを出してスキップする。
pub(super) async fn handle_list<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Vec<T>, InfraError> {
    let items: Option<Vec<serde_json::Value>> = handle_json(response, None).await?;

    Ok(items
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(
                    error.category = error::category::EXTERNAL_SERVICE,
                    error.kind = error::kind::DATA_SERVICE,
                    index,
                    error = %e,
                    "一覧の要素をデシリアライズできないためスキップ"
                );
                None
            }
        })
        .collect())
}

/// ボディを使わないレスポンスのハンドリング
pub(super) async fn handle_empty(
    response: reqwest::Response,
    not_found_error: Option<InfraError>,
) -> Result<(), InfraError> {
    check_status(response, not_found_error).await.map(|_| ())
}

async fn check_status(
    response: reqwest::Response,
    not_found_error: Option<InfraError>,
) -> Result<reqwest::Response, InfraError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND
        && let Some(err) = not_found_error
    {
        return Err(err);
    }

    let body = response.text().await.unwrap_or_default();
    Err(InfraError::unexpected_status(status.as_u16(), body))
}
