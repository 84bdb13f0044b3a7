pub mod features;
pub mod shared;

#[cfg(test)]
pub(crate) mod test_support;

use features::navigation::{Route, Router};
use log::info;
use shared::config::initialize_application;
use shared::context::AppContext;
use shared::errors::AppResult;
use shared::identity::IdentityCache;
use shared::store::memory::{fixture_bills, InMemoryStore};
use shared::store::Store;
use std::sync::Arc;

pub use features::bills::{BillRecord, BillStatus, BillsController, DisplayBillRecord};
pub use features::new_bill::{NewBillController, NewBillForm, SelectedFile};
pub use shared::errors::AppError;

/// 開発用のインメモリストアでアプリケーションを起動する
///
/// # 引数
/// * `identity` - ログイン済みユーザーを保持する識別情報キャッシュ
///
/// # 戻り値
/// 初期画面（従業員はノート一覧、それ以外はログイン画面）を描画済みのルーター
pub async fn start_application(identity: IdentityCache) -> AppResult<Arc<Router>> {
    let init = initialize_application()?;

    let store: Arc<dyn Store> = Arc::new(InMemoryStore::with_config(
        fixture_bills(),
        init.store_config.clone(),
    ));
    let context =
        AppContext::new(Some(store), identity).with_receipt_policy(init.receipt_policy.clone());

    let router = Router::new(context);
    router.navigate(Route::Bills).await;

    info!(
        "アプリケーションを起動しました: route={:?}",
        router.current_route()
    );
    Ok(router)
}
