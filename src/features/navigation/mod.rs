/// 画面遷移モジュール
///
/// ルート定義、ナビゲーターのインターフェース、
/// 画面領域とコントローラーを結び付けるルーターを提供します。
pub mod router;
pub mod routes;
pub mod views;

#[cfg(test)]
mod integration_tests;

use async_trait::async_trait;

pub use router::{Router, RouterNavigator};
pub use routes::Route;

/// 画面遷移のインターフェース
#[async_trait]
pub trait Navigator: Send + Sync {
    /// 指定したルートへ遷移する
    async fn on_navigate(&self, route: Route);
}
