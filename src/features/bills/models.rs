use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// ノートのステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    /// 承認待ち
    Pending,
    /// 承認済み
    Accepted,
    /// 却下
    Refused,
}

impl BillStatus {
    /// ストア上の文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BillStatus::Pending),
            "accepted" => Ok(BillStatus::Accepted),
            "refused" => Ok(BillStatus::Refused),
            other => Err(format!("不明なステータスです: {other}")),
        }
    }
}

/// アップロード済み領収書への参照
///
/// URLと表示名は常に対で扱う
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptRef {
    pub file_url: String,
    pub file_name: String,
}

impl ReceiptRef {
    /// URLと表示名がそろっている場合のみ参照を作成する
    pub fn from_parts(file_url: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        match (file_url, file_name) {
            (Some(file_url), Some(file_name)) => Some(Self {
                file_url: file_url.to_string(),
                file_name: file_name.to_string(),
            }),
            _ => None,
        }
    }
}

/// 経費ノート（ストア上のレコード）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRecord {
    /// ストアが割り当てるID（作成前の候補ではNone）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: String,
    /// 経費の種類
    #[serde(rename = "type", default)]
    pub expense_type: String,
    #[serde(default)]
    pub name: String,
    /// 金額（数値でない入力はnull）
    #[serde(default)]
    pub amount: Option<i64>,
    /// 日付（YYYY-MM-DD）
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub vat: String,
    #[serde(default)]
    pub pct: Option<i64>,
    #[serde(default)]
    pub commentary: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub status: String,
}

impl BillRecord {
    /// 添付された領収書を取得する
    ///
    /// # 戻り値
    /// URLと表示名が両方そろっている場合のみSome
    pub fn receipt(&self) -> Option<ReceiptRef> {
        ReceiptRef::from_parts(self.file_url.as_deref(), self.file_name.as_deref())
    }

    /// 領収書を設定する（URLと表示名を同時に更新）
    pub fn set_receipt(&mut self, receipt: Option<ReceiptRef>) {
        match receipt {
            Some(receipt) => {
                self.file_url = Some(receipt.file_url);
                self.file_name = Some(receipt.file_name);
            }
            None => {
                self.file_url = None;
                self.file_name = None;
            }
        }
    }

    /// 領収書のURLと表示名が対になっているかを検証
    pub fn has_consistent_receipt(&self) -> bool {
        self.file_url.is_some() == self.file_name.is_some()
    }
}

/// 表示用に書式変換されたノート
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayBillRecord {
    #[serde(flatten)]
    pub bill: BillRecord,
    /// 並び替え用の元の日付
    #[serde(skip)]
    pub sort_key: String,
}

impl DisplayBillRecord {
    pub fn id(&self) -> Option<&str> {
        self.bill.id.as_deref()
    }

    /// 表示用の日付（書式変換に失敗した場合は元の値）
    pub fn date(&self) -> &str {
        &self.bill.date
    }

    /// 表示用のステータス
    pub fn status(&self) -> &str {
        &self.bill.status
    }
}

/// VATは文字列と数値のどちらでも受け付ける
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
