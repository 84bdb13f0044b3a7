/// ストアインターフェース
///
/// ノートの永続化を担うリモートストアへの抽象化です。
/// 具体的な通信方式（HTTPクライアント、リトライ）はこのクレートの範囲外で、
/// 実装側は失敗を `AppError::NotFound` / `AppError::Server` /
/// `AppError::ExternalService` のいずれかで返します。
pub mod memory;

use crate::features::bills::models::BillRecord;
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 領収書アップロードのペイロード（マルチパート相当）
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptUpload {
    /// ファイルの内容
    pub data: Vec<u8>,
    /// 元のファイル名
    pub file_name: String,
    /// Content-Type
    pub content_type: String,
    /// アップロードするユーザーのメールアドレス
    pub email: String,
}

/// 領収書アップロードの結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedReceipt {
    pub file_url: String,
    pub file_name: String,
    /// ストアがアップロード時にノートを仮作成した場合のID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// ノートリソースの操作
#[async_trait]
pub trait BillsResource: Send + Sync {
    /// ノート一覧を取得する
    async fn list(&self) -> AppResult<Vec<BillRecord>>;

    /// ノートを作成する
    async fn create(&self, bill: BillRecord) -> AppResult<BillRecord>;

    /// 既存のノートを更新する
    async fn update(&self, id: &str, bill: BillRecord) -> AppResult<BillRecord>;

    /// 領収書ファイルをアップロードする
    async fn upload(&self, receipt: ReceiptUpload) -> AppResult<UploadedReceipt>;
}

/// リモートストア
pub trait Store: Send + Sync {
    /// ノートリソースへのアクセサ
    fn bills(&self) -> Arc<dyn BillsResource>;
}
