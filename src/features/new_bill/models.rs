use crate::features::bills::models::{BillRecord, BillStatus, ReceiptRef};
use crate::shared::store::UploadedReceipt;
use crate::shared::utils::parse_int_lenient;
use serde::{Deserialize, Serialize};

/// ユーザーが選択したファイル
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    /// ファイル名（パスを含まない）
    pub name: String,
    /// ブラウザが報告したMIMEタイプ（不明な場合はNone）
    pub mime_type: Option<String>,
    pub data: Vec<u8>,
}

impl SelectedFile {
    pub fn new<S: Into<String>>(name: S, mime_type: Option<&str>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.map(str::to_string),
            data,
        }
    }
}

/// 送信時点のフォーム入力値
///
/// 数値項目も入力されたままの文字列で保持する
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBillForm {
    #[serde(rename = "type")]
    pub expense_type: String,
    pub name: String,
    pub amount: String,
    pub date: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

impl NewBillForm {
    /// ストアへ送るノートの候補を組み立てる
    ///
    /// # 引数
    /// * `email` - 識別情報キャッシュ上のメールアドレス
    /// * `receipt` - アップロード済みの領収書
    ///
    /// # 戻り値
    /// ステータスが`pending`の、IDを持たないノート
    pub fn to_candidate(&self, email: &str, receipt: Option<ReceiptRef>) -> BillRecord {
        let commentary = if self.commentary.is_empty() {
            None
        } else {
            Some(self.commentary.clone())
        };

        let mut candidate = BillRecord {
            id: None,
            email: email.to_string(),
            expense_type: self.expense_type.clone(),
            name: self.name.clone(),
            amount: parse_int_lenient(&self.amount),
            date: self.date.clone(),
            vat: self.vat.clone(),
            pct: parse_int_lenient(&self.pct),
            commentary,
            file_url: None,
            file_name: None,
            status: BillStatus::Pending.to_string(),
        };
        candidate.set_receipt(receipt);
        candidate
    }
}

/// ファイル選択から送信までの間に保持するアップロード情報
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingUpload {
    pub file_name: Option<String>,
    /// アップロード完了後に設定される
    pub file_url: Option<String>,
    /// ストアがアップロード時に仮作成したノートのID
    pub bill_id: Option<String>,
}

impl PendingUpload {
    pub fn from_uploaded(uploaded: &UploadedReceipt) -> Self {
        Self {
            file_name: Some(uploaded.file_name.clone()),
            file_url: Some(uploaded.file_url.clone()),
            bill_id: uploaded.id.clone(),
        }
    }

    /// 添付済みの領収書
    pub fn receipt(&self) -> Option<ReceiptRef> {
        ReceiptRef::from_parts(self.file_url.as_deref(), self.file_name.as_deref())
    }
}

/// ノート作成セッションのフェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// ファイル未選択
    Idle,
    /// 領収書をアップロード中
    FileUploading,
    /// 領収書のアップロード完了
    FileReady,
    /// ノートを送信中
    Submitting,
    /// 送信が完了し一覧へ遷移した
    NavigatedAway,
    /// 送信前に画面を離れた
    Abandoned,
}

impl SessionPhase {
    /// セッションが終了しているか
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::NavigatedAway | SessionPhase::Abandoned)
    }
}

/// ファイル選択の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    /// 許可されていない拡張子のため拒否した
    Rejected,
    /// アップロードが完了し状態に反映した
    Uploaded(UploadedReceipt),
    /// 完了前にセッションが終了したか、新しい選択に置き換えられたため破棄した
    Discarded,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewBillForm {
        NewBillForm {
            expense_type: "Transports".to_string(),
            name: "Vol Paris Londres".to_string(),
            amount: "348".to_string(),
            date: "2022-04-08".to_string(),
            vat: "70".to_string(),
            pct: "20".to_string(),
            commentary: String::new(),
        }
    }

    #[test]
    fn test_to_candidate() {
        let receipt = ReceiptRef {
            file_url: "https://localhost:3456/images/test.jpg".to_string(),
            file_name: "test.jpg".to_string(),
        };
        let candidate = form().to_candidate("a@a", Some(receipt));

        assert_eq!(candidate.id, None);
        assert_eq!(candidate.email, "a@a");
        assert_eq!(candidate.amount, Some(348));
        assert_eq!(candidate.pct, Some(20));
        assert_eq!(candidate.vat, "70");
        assert_eq!(candidate.commentary, None);
        assert_eq!(candidate.status, "pending");
        assert_eq!(candidate.file_name.as_deref(), Some("test.jpg"));
        assert!(candidate.has_consistent_receipt());
    }

    #[test]
    fn test_to_candidate_with_non_numeric_values() {
        let mut form = form();
        form.amount = "abc".to_string();
        form.pct = "12.5%".to_string();
        form.commentary = "séminaire".to_string();

        let candidate = form.to_candidate("a@a", None);

        assert_eq!(candidate.amount, None);
        assert_eq!(candidate.pct, Some(12));
        assert_eq!(candidate.commentary.as_deref(), Some("séminaire"));
        assert!(candidate.file_url.is_none() && candidate.file_name.is_none());
    }

    #[test]
    fn test_pending_upload_receipt() {
        let mut pending = PendingUpload {
            file_name: Some("test.jpg".to_string()),
            ..PendingUpload::default()
        };
        assert!(pending.receipt().is_none());

        pending.file_url = Some("https://localhost:3456/images/test.jpg".to_string());
        assert_eq!(pending.receipt().unwrap().file_name, "test.jpg");
    }

    #[test]
    fn test_terminal_phases() {
        assert!(SessionPhase::NavigatedAway.is_terminal());
        assert!(SessionPhase::Abandoned.is_terminal());
        assert!(!SessionPhase::FileReady.is_terminal());
    }
}
