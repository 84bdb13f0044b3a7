/// ノート一覧機能
pub mod bills;

/// ノート作成機能
pub mod new_bill;

/// 画面遷移
pub mod navigation;
