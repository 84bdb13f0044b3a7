/// コントローラーへ渡す実行コンテキスト
///
/// ストア・識別情報キャッシュ・書式変換をグローバル状態ではなく
/// 明示的な依存として保持します。
use crate::shared::config::environment::ReceiptPolicy;
use crate::shared::format::{FrenchRecordFormatter, RecordFormatter};
use crate::shared::identity::IdentityCache;
use crate::shared::store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    /// リモートストア（未設定の場合は一覧取得が何もしない）
    pub store: Option<Arc<dyn Store>>,
    pub identity: IdentityCache,
    pub formatter: Arc<dyn RecordFormatter>,
    pub receipt_policy: ReceiptPolicy,
}

impl AppContext {
    /// デフォルトの書式変換と受け入れポリシーでコンテキストを作成する
    pub fn new(store: Option<Arc<dyn Store>>, identity: IdentityCache) -> Self {
        Self {
            store,
            identity,
            formatter: Arc::new(FrenchRecordFormatter),
            receipt_policy: ReceiptPolicy::default(),
        }
    }

    /// 書式変換を差し替える
    pub fn with_formatter(mut self, formatter: Arc<dyn RecordFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// 領収書の受け入れポリシーを差し替える
    pub fn with_receipt_policy(mut self, receipt_policy: ReceiptPolicy) -> Self {
        self.receipt_policy = receipt_policy;
        self
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("store", &self.store.is_some())
            .field("identity", &self.identity)
            .field("receipt_policy", &self.receipt_policy)
            .finish()
    }
}
