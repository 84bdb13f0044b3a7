/// ノート一覧機能モジュール
///
/// - ストア上のノートレコードのモデル
/// - 表示用の書式変換を行う一覧コントローラー
pub mod controller;
pub mod models;

// モデル
pub use models::{BillRecord, BillStatus, DisplayBillRecord, ReceiptRef};

// コントローラー
pub use controller::{to_display_bill, BillsController};
