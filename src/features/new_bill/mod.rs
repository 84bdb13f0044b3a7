/// ノート作成機能モジュール
///
/// - 領収書ファイルの検証
/// - ファイル選択時のアップロードとフォーム送信を行うコントローラー
pub mod controller;
pub mod models;
pub mod validation;

// モデル
pub use models::{FileSelection, NewBillForm, PendingUpload, SelectedFile, SessionPhase};

// コントローラー
pub use controller::{NewBillController, NewBillView};

// バリデーション
pub use validation::{validate_receipt_file, INVALID_EXTENSION_MESSAGE};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _form: Option<NewBillForm> = None;
        let _file: Option<SelectedFile> = None;
        let _pending: Option<PendingUpload> = None;
        let _selection: Option<FileSelection> = None;
        let _controller: Option<NewBillController> = None;

        assert_eq!(INVALID_EXTENSION_MESSAGE, "Extension de fichier non autorisée");
        assert_eq!(SessionPhase::Idle, SessionPhase::Idle);
    }
}
