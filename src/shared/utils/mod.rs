pub mod nanoid;

use once_cell::sync::Lazy;
use regex::Regex;

/// 先頭の整数部分（符号付き）にマッチする正規表現
static LEADING_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("整数パターンは固定値"));

/// フォーム入力値を寛容に整数へ変換する
///
/// # 引数
/// * `input` - フォームの入力文字列
///
/// # 戻り値
/// 先頭の整数部分、数値で始まらない場合や範囲外の場合はNone
///
/// # 例
/// - "20" -> Some(20)
/// - " 12€" -> Some(12)
/// - "12.9" -> Some(12)
/// - "abc" -> None
pub fn parse_int_lenient(input: &str) -> Option<i64> {
    LEADING_INTEGER
        .captures(input)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// ファイル名から拡張子を取得する（小文字化）
///
/// # 戻り値
/// 拡張子、存在しない場合はNone
pub fn file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_lowercase())
}

/// 拡張子からContent-Typeを取得する
pub fn content_type_for_extension(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
