/// 表示用の書式変換
///
/// ストアから取得した日付・ステータスを画面表示用の文字列に変換します。
use crate::features::bills::models::BillStatus;
use crate::shared::errors::{AppError, AppResult};
use chrono::{DateTime, Datelike, NaiveDate};

/// レコードの書式変換インターフェース
pub trait RecordFormatter: Send + Sync {
    /// 日付を表示用に変換する（不正な日付の場合はエラー）
    fn format_date(&self, raw: &str) -> AppResult<String>;

    /// ステータスを表示用に変換する
    fn format_status(&self, raw: &str) -> String;
}

/// フランス語表記の書式変換
#[derive(Debug, Clone, Copy, Default)]
pub struct FrenchRecordFormatter;

/// フランス語の月の短縮名（Intlのfrロケールと同じ表記）
const FRENCH_SHORT_MONTHS: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

impl FrenchRecordFormatter {
    /// 日付文字列を解析する
    ///
    /// YYYY-MM-DD形式とRFC3339形式を受け付ける
    fn parse_date(raw: &str) -> AppResult<NaiveDate> {
        let trimmed = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| dt.date_naive())
            .map_err(|_| AppError::format(format!("日付を解析できません: {raw:?}")))
    }
}

impl RecordFormatter for FrenchRecordFormatter {
    /// 例: "2004-04-04" -> "4 Avr. 04"
    fn format_date(&self, raw: &str) -> AppResult<String> {
        let date = Self::parse_date(raw)?;

        let month_name = FRENCH_SHORT_MONTHS[date.month0() as usize];
        let month: String = month_name
            .chars()
            .take(3)
            .enumerate()
            .map(|(i, c)| if i == 0 { c.to_ascii_uppercase() } else { c })
            .collect();
        let year = date.year().rem_euclid(100);

        Ok(format!("{} {month}. {year:02}", date.day()))
    }

    fn format_status(&self, raw: &str) -> String {
        match raw.parse::<BillStatus>() {
            Ok(BillStatus::Pending) => "En attente".to_string(),
            Ok(BillStatus::Accepted) => "Accepté".to_string(),
            Ok(BillStatus::Refused) => "Refused".to_string(),
            Err(_) => raw.to_string(),
        }
    }
}
