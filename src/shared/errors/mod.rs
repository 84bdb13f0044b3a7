use thiserror::Error;

/// アプリケーション全体で使用される統一エラー型
#[derive(Debug, Error)]
pub enum AppError {
    /// バリデーション関連のエラー
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// リソースが見つからない場合のエラー（HTTP 404相当）
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// ストア側の内部エラー（HTTP 5xx相当）
    #[error("サーバーエラー: {0}")]
    Server(String),

    /// 外部サービス連携でのエラー
    #[error("外部サービスエラー: {0}")]
    ExternalService(String),

    /// 日付などの書式変換エラー
    #[error("書式エラー: {0}")]
    Format(String),

    /// 識別情報（ログインユーザー）関連のエラー
    #[error("セッションエラー: {0}")]
    Session(String),

    /// 設定関連のエラー
    #[error("設定エラー: {0}")]
    Configuration(String),

    /// 並行処理関連のエラー
    #[error("並行処理エラー: {0}")]
    Concurrency(String),

    /// I/O関連のエラー
    #[error("I/Oエラー: {0}")]
    Io(#[from] std::io::Error),

    /// JSON解析エラー
    #[error("JSON解析エラー: {0}")]
    Json(#[from] serde_json::Error),
}

/// エラーの重要度を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    /// 低重要度（ユーザー入力エラーなど）
    Low,
    /// 中重要度（外部サービス一時的エラーなど）
    Medium,
    /// 高重要度（設定エラーなど）
    High,
}

impl AppError {
    /// ユーザーに表示するためのフレンドリーなメッセージを取得
    ///
    /// # 戻り値
    /// ユーザーに表示可能なエラーメッセージ（画面はフランス語）
    pub fn user_message(&self) -> &str {
        match self {
            AppError::Validation(msg) => msg,
            AppError::NotFound(_) => "Erreur 404",
            AppError::Server(_) => "Erreur 500",
            AppError::ExternalService(_) => "Le service est momentanément indisponible",
            AppError::Format(_) => "Format de données invalide",
            AppError::Session(_) => "Veuillez vous reconnecter",
            AppError::Configuration(_) => "Erreur de configuration",
            AppError::Concurrency(msg) => msg,
            AppError::Io(_) => "Erreur de lecture du fichier",
            AppError::Json(_) => "Format de données invalide",
        }
    }

    /// エラーの詳細情報を取得
    ///
    /// # 戻り値
    /// エラーの詳細情報（ログ出力用）
    pub fn details(&self) -> String {
        format!("{self}")
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Validation(_) => ErrorSeverity::Low,
            AppError::NotFound(_) => ErrorSeverity::Low,
            AppError::Format(_) => ErrorSeverity::Low,
            AppError::Concurrency(_) => ErrorSeverity::Low,
            AppError::Server(_) => ErrorSeverity::Medium,
            AppError::ExternalService(_) => ErrorSeverity::Medium,
            AppError::Session(_) => ErrorSeverity::Medium,
            AppError::Io(_) => ErrorSeverity::Medium,
            AppError::Json(_) => ErrorSeverity::Medium,
            AppError::Configuration(_) => ErrorSeverity::High,
        }
    }

    /// 重要度に応じたログレベル
    ///
    /// 低重要度は警告、それ以外はエラーとして記録する
    pub fn log_level(&self) -> log::Level {
        match self.severity() {
            ErrorSeverity::Low => log::Level::Warn,
            ErrorSeverity::Medium | ErrorSeverity::High => log::Level::Error,
        }
    }

    /// ストア由来のエラーが表すHTTPステータスを取得
    ///
    /// # 戻り値
    /// 404 / 500 のいずれか、該当しない場合はNone
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AppError::NotFound(_) => Some(404),
            AppError::Server(_) => Some(500),
            _ => None,
        }
    }

    /// HTTPステータスとメッセージからエラーを作成する
    ///
    /// # 引数
    /// * `status` - HTTPステータスコード
    /// * `message` - エラーメッセージ
    ///
    /// # 戻り値
    /// 404はNotFound、5xxはServer、それ以外はExternalService
    pub fn from_status<S: Into<String>>(status: u16, message: S) -> Self {
        let message = message.into();
        match status {
            404 => AppError::NotFound(message),
            500..=599 => AppError::Server(message),
            _ => AppError::external_service(format!("HTTP {status}"), message),
        }
    }

    /// 文字列メッセージしか返さないストアのエラーを分類する
    ///
    /// メッセージに "404" を含む場合はNotFound、"500" を含む場合はServer、
    /// それ以外はExternalServiceとして扱う。
    pub fn from_store_message<S: Into<String>>(message: S) -> Self {
        let message = message.into();
        if message.contains("404") {
            AppError::NotFound(message)
        } else if message.contains("500") {
            AppError::Server(message)
        } else {
            AppError::external_service("ストア".to_string(), message)
        }
    }

    /// バリデーションエラーを作成するヘルパー関数
    pub fn validation<S: Into<String>>(message: S) -> Self {
        AppError::Validation(message.into())
    }

    /// リソース未発見エラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `resource` - 見つからなかったリソース名
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        AppError::NotFound(format!("{}が見つかりません", resource.into()))
    }

    /// 外部サービスエラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `service` - サービス名
    /// * `message` - エラーメッセージ
    pub fn external_service<S: Into<String>>(service: S, message: S) -> Self {
        AppError::ExternalService(format!("{}: {}", service.into(), message.into()))
    }

    /// 書式エラーを作成するヘルパー関数
    pub fn format<S: Into<String>>(message: S) -> Self {
        AppError::Format(message.into())
    }

    /// セッションエラーを作成するヘルパー関数
    pub fn session<S: Into<String>>(message: S) -> Self {
        AppError::Session(message.into())
    }

    /// 設定エラーを作成するヘルパー関数
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// 並行処理エラーを作成するヘルパー関数
    pub fn concurrency<S: Into<String>>(message: S) -> Self {
        AppError::Concurrency(message.into())
    }
}

/// Result型のエイリアス（アプリケーション全体で使用）
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        assert_eq!(AppError::validation("テスト").severity(), ErrorSeverity::Low);
        assert_eq!(
            AppError::not_found("ノート").severity(),
            ErrorSeverity::Low
        );
        assert_eq!(
            AppError::external_service("store", "接続失敗").severity(),
            ErrorSeverity::Medium
        );
        assert_eq!(
            AppError::configuration("設定ファイル不正").severity(),
            ErrorSeverity::High
        );
    }

    #[test]
    fn test_log_level_follows_severity() {
        assert_eq!(
            AppError::from_store_message("Erreur 404").log_level(),
            log::Level::Warn
        );
        assert_eq!(
            AppError::from_store_message("Erreur 500").log_level(),
            log::Level::Error
        );
        assert_eq!(
            AppError::configuration("設定ファイル不正").log_level(),
            log::Level::Error
        );
    }

    #[test]
    fn test_user_message() {
        let validation_error = AppError::validation("Extension de fichier non autorisée");
        assert_eq!(
            validation_error.user_message(),
            "Extension de fichier non autorisée"
        );

        assert_eq!(AppError::not_found("bills").user_message(), "Erreur 404");
        assert_eq!(
            AppError::Server("boom".to_string()).user_message(),
            "Erreur 500"
        );
    }

    #[test]
    fn test_from_status() {
        assert!(matches!(
            AppError::from_status(404, "absent"),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from_status(500, "boom"),
            AppError::Server(_)
        ));
        assert!(matches!(
            AppError::from_status(503, "indisponible"),
            AppError::Server(_)
        ));
        assert!(matches!(
            AppError::from_status(401, "auth"),
            AppError::ExternalService(_)
        ));
    }

    #[test]
    fn test_from_store_message() {
        // 文字列ベースのストアとの互換性
        let not_found = AppError::from_store_message("Erreur 404");
        assert_eq!(not_found.status_code(), Some(404));

        let server = AppError::from_store_message("Erreur 500");
        assert_eq!(server.status_code(), Some(500));

        let other = AppError::from_store_message("connexion perdue");
        assert_eq!(
            other.details(),
            "外部サービスエラー: ストア: connexion perdue"
        );
        assert_eq!(other.status_code(), None);
    }

    #[test]
    fn test_error_details() {
        let error = AppError::validation("詳細テスト");
        let details = error.details();
        assert!(details.contains("詳細テスト"));
        assert!(details.contains("バリデーションエラー"));
    }
}
