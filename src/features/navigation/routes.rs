use serde::{Deserialize, Serialize};
use std::fmt;

/// 画面のルート
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// ログイン画面
    Login,
    /// 従業員のノート一覧
    Bills,
    /// ノート作成フォーム
    NewBill,
    /// 管理者ダッシュボード
    Dashboard,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Login, Route::Bills, Route::NewBill, Route::Dashboard];

    /// ルートのパス
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Bills => "#employee/bills",
            Route::NewBill => "#employee/bill/new",
            Route::Dashboard => "#admin/dashboard",
        }
    }

    /// パスからルートを解決する
    ///
    /// # 引数
    /// * `path` - ロケーションのハッシュ（空文字列はログイン画面）
    ///
    /// # 戻り値
    /// 一致するルート、該当しない場合はNone
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.trim();
        if path.is_empty() {
            return Some(Route::Login);
        }
        Route::ALL.into_iter().find(|route| route.path() == path)
    }

    /// 従業員向けのルートか
    pub fn requires_employee(&self) -> bool {
        matches!(self, Route::Bills | Route::NewBill)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
