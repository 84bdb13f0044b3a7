/// 識別情報キャッシュモジュール
///
/// タブ単位のキー/値ストアとして、ログイン中ユーザーの最小限のプロフィール
/// （種別とメールアドレス）を保持します。グローバル状態ではなく、
/// コントローラーのコンストラクタへ明示的に渡して使用します。
use crate::shared::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// 識別情報キャッシュのキー定義
pub struct IdentityKeys;

impl IdentityKeys {
    /// ログインユーザーのキー
    pub const USER: &'static str = "user";
}

/// ユーザー種別
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    /// 従業員
    Employee,
    /// 管理者
    Admin,
    /// その他（未知の種別）
    #[serde(other)]
    Other,
}

/// キャッシュされたユーザー情報
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedUser {
    /// ユーザー種別
    #[serde(rename = "type")]
    pub user_type: UserType,
    /// メールアドレス（未設定の場合あり）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CachedUser {
    /// 従業員ユーザーを作成する
    pub fn employee<S: Into<String>>(email: S) -> Self {
        Self {
            user_type: UserType::Employee,
            email: Some(email.into()),
        }
    }

    /// 従業員かどうかを判定
    pub fn is_employee(&self) -> bool {
        self.user_type == UserType::Employee
    }
}

/// 識別情報キャッシュ
///
/// クローンしたインスタンスは同じ内容を共有する
#[derive(Debug, Clone, Default)]
pub struct IdentityCache {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl IdentityCache {
    /// 空のキャッシュを作成する
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定したユーザーでログイン済みのキャッシュを作成する
    pub fn with_user(user: &CachedUser) -> AppResult<Self> {
        let cache = Self::new();
        cache.set_user(user)?;
        Ok(cache)
    }

    /// 値を取得する
    ///
    /// # 戻り値
    /// 値（存在しない場合はNone）
    pub fn get_item(&self, key: &str) -> Option<String> {
        match self.items.read() {
            Ok(items) => items.get(key).cloned(),
            Err(poisoned) => {
                log::warn!("識別情報キャッシュのロックが汚染されています。内容をそのまま使用します");
                poisoned.into_inner().get(key).cloned()
            }
        }
    }

    /// 値を保存する
    pub fn set_item<K: Into<String>, V: Into<String>>(&self, key: K, value: V) -> AppResult<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| AppError::concurrency(format!("識別情報キャッシュのロック取得エラー: {e}")))?;
        items.insert(key.into(), value.into());
        Ok(())
    }

    /// 値を削除する
    pub fn remove_item(&self, key: &str) -> AppResult<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| AppError::concurrency(format!("識別情報キャッシュのロック取得エラー: {e}")))?;
        items.remove(key);
        Ok(())
    }

    /// ログインユーザーを保存する
    pub fn set_user(&self, user: &CachedUser) -> AppResult<()> {
        let json = serde_json::to_string(user)?;
        self.set_item(IdentityKeys::USER, json)?;
        log::debug!("ログインユーザーを保存しました: type={:?}", user.user_type);
        Ok(())
    }

    /// ログインユーザーを取得する
    ///
    /// # 戻り値
    /// ユーザー情報、未ログインまたは内容が不正な場合はNone
    pub fn current_user(&self) -> Option<CachedUser> {
        let raw = self.get_item(IdentityKeys::USER)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("キャッシュされたユーザー情報を解析できません: {e}");
                None
            }
        }
    }

    /// ログインユーザーのメールアドレスを取得する
    ///
    /// # 戻り値
    /// メールアドレス、取得できない場合はセッションエラー
    pub fn current_email(&self) -> AppResult<String> {
        self.current_user()
            .and_then(|user| user.email)
            .ok_or_else(|| AppError::session("ログインユーザーのメールアドレスがありません"))
    }
}
