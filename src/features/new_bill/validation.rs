use super::models::SelectedFile;
use crate::shared::config::environment::ReceiptPolicy;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{content_type_for_extension, file_extension};

/// 許可されていないファイルを選択したときのアラート文言
pub const INVALID_EXTENSION_MESSAGE: &str = "Extension de fichier non autorisée";

/// 選択された領収書ファイルを検証する
///
/// # 引数
/// * `file` - 選択されたファイル
/// * `policy` - 受け入れポリシー
///
/// # 戻り値
/// アップロード時に使用するContent-Type
///
/// # エラー
/// 拡張子が許可されていない場合、またはMIMEタイプが拡張子と一致しない場合は
/// `INVALID_EXTENSION_MESSAGE` を持つバリデーションエラー
pub fn validate_receipt_file(file: &SelectedFile, policy: &ReceiptPolicy) -> AppResult<String> {
    let extension = file_extension(&file.name)
        .filter(|ext| policy.allows_extension(ext))
        .ok_or_else(|| AppError::validation(INVALID_EXTENSION_MESSAGE))?;

    let content_type = content_type_for_extension(&extension);

    // ブラウザが空文字列を返すことがある
    if let Some(mime_type) = file.mime_type.as_deref().filter(|m| !m.trim().is_empty()) {
        if !is_accepted_mime_type(&extension, mime_type) {
            return Err(AppError::validation(INVALID_EXTENSION_MESSAGE));
        }
    }

    Ok(content_type.to_string())
}

/// 拡張子に対して受け入れるMIMEタイプか
///
/// ブラウザやOSによって報告される別名（image/pjpeg など）も受け入れる
fn is_accepted_mime_type(extension: &str, mime_type: &str) -> bool {
    let mime_type = mime_type.trim().to_ascii_lowercase();
    match extension {
        "jpg" | "jpeg" => matches!(
            mime_type.as_str(),
            "image/jpeg" | "image/pjpeg" | "image/jpg"
        ),
        "png" => matches!(mime_type.as_str(), "image/png" | "image/x-png"),
        other => mime_type == content_type_for_extension(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime_type: Option<&str>) -> SelectedFile {
        SelectedFile::new(name, mime_type, vec![1, 2, 3])
    }

    #[test]
    fn test_allowed_extensions() {
        let policy = ReceiptPolicy::default();

        assert_eq!(
            validate_receipt_file(&file("test.jpg", Some("image/jpeg")), &policy).unwrap(),
            "image/jpeg"
        );
        assert_eq!(
            validate_receipt_file(&file("test.JPEG", None), &policy).unwrap(),
            "image/jpeg"
        );
        assert_eq!(
            validate_receipt_file(&file("scan.Png", Some("image/png")), &policy).unwrap(),
            "image/png"
        );
    }

    #[test]
    fn test_rejected_extensions() {
        let policy = ReceiptPolicy::default();

        for name in ["test.txt", "facture.pdf", "sans_extension", "image.jpg.exe", ".jpg"] {
            let error = validate_receipt_file(&file(name, None), &policy).unwrap_err();
            assert_eq!(error.user_message(), INVALID_EXTENSION_MESSAGE, "{name}");
        }
    }

    #[test]
    fn test_mime_type_must_match_extension() {
        let policy = ReceiptPolicy::default();

        assert!(validate_receipt_file(&file("test.jpg", Some("text/plain")), &policy).is_err());
        assert!(validate_receipt_file(&file("test.png", Some("image/jpeg")), &policy).is_err());
        assert!(validate_receipt_file(&file("test.png", Some("")), &policy).is_ok());
    }

    #[test]
    fn test_mime_type_aliases_are_accepted() {
        let policy = ReceiptPolicy::default();

        for (name, mime_type, expected) in [
            ("scan.jpg", "image/pjpeg", "image/jpeg"),
            ("scan.jpg", "image/jpg", "image/jpeg"),
            ("scan.jpeg", "IMAGE/JPEG", "image/jpeg"),
            ("scan.png", "image/x-png", "image/png"),
        ] {
            assert_eq!(
                validate_receipt_file(&file(name, Some(mime_type)), &policy).unwrap(),
                expected,
                "{name} {mime_type}"
            );
        }

        assert!(validate_receipt_file(&file("scan.png", Some("image/pjpeg")), &policy).is_err());
    }

    #[test]
    fn test_custom_policy() {
        let policy = ReceiptPolicy::from_list("png");

        assert!(validate_receipt_file(&file("test.png", None), &policy).is_ok());
        assert!(validate_receipt_file(&file("test.jpg", None), &policy).is_err());
    }
}
