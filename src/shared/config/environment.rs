use std::path::Path;
use std::time::Duration;

/// アプリケーションの実行環境を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 開発環境
    Development,
    /// プロダクション環境
    Production,
}

/// 環境変数取得エラー
#[derive(Debug, Clone)]
pub struct EnvVarError {
    /// 変数名
    pub var_name: String,
    /// エラーメッセージ
    pub message: String,
}

impl std::fmt::Display for EnvVarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "環境変数 {} が見つかりません: {}",
            self.var_name, self.message
        )
    }
}

impl std::error::Error for EnvVarError {}

/// 環境変数を取得する（優先順位: 起動時 > コンパイル時 > エラー）
///
/// # 取得順序
/// 1. 起動時の環境変数（`std::env::var`）
/// 2. コンパイル時の環境変数（`option_env!`マクロ）
/// 3. どちらも見つからない場合はエラー
#[macro_export]
macro_rules! get_env_var {
    ($var_name:expr) => {{
        if let Ok(value) = std::env::var($var_name) {
            log::debug!("環境変数 {} を起動時の環境変数から取得しました", $var_name);
            Ok(value)
        } else if let Some(value) = option_env!($var_name) {
            log::debug!("環境変数 {} をコンパイル時の環境変数から取得しました", $var_name);
            Ok(value.to_string())
        } else {
            Err($crate::shared::config::environment::EnvVarError {
                var_name: $var_name.to_string(),
                message: format!(
                    "起動時の環境変数 {} もコンパイル時の環境変数も見つかりませんでした",
                    $var_name
                ),
            })
        }
    }};
}

/// 環境変数を取得する（デフォルト値付き）
#[macro_export]
macro_rules! get_env_var_or_default {
    ($var_name:expr, $default_value:expr) => {{
        $crate::get_env_var!($var_name).unwrap_or_else(|_| {
            log::debug!(
                "環境変数 {} が見つからないため、デフォルト値を使用します: {}",
                $var_name,
                $default_value
            );
            $default_value.to_string()
        })
    }};
}

/// 環境設定を管理する構造体
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// 実行環境
    pub environment: String,
    /// ログレベル
    pub log_level: String,
}

impl EnvironmentConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Self {
        let environment = get_environment();
        let default_level = match environment {
            Environment::Development => "debug",
            Environment::Production => "info",
        };
        let log_level = crate::get_env_var_or_default!("LOG_LEVEL", default_level);

        Self {
            environment: format!("{environment:?}").to_lowercase(),
            log_level,
        }
    }

    /// 設定されたログレベルをフィルターに変換する
    ///
    /// 未知の値はInfoとして扱う
    pub fn level_filter(&self) -> log::LevelFilter {
        match self.log_level.to_lowercase().as_str() {
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        }
    }
}

/// 現在の実行環境を判定する
///
/// # 判定ロジック
/// 1. 実行時環境変数 ENVIRONMENT を確認
/// 2. デバッグビルドの場合は Development
/// 3. リリースビルドの場合は Production
pub fn get_environment() -> Environment {
    if let Ok(env_var) = std::env::var("ENVIRONMENT") {
        let env = match env_var.as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        };
        log::debug!("環境判定: 実行時環境変数を使用 -> {env_var} -> {env:?}");
        return env;
    }

    let env = if cfg!(debug_assertions) {
        Environment::Development
    } else {
        Environment::Production
    };
    log::debug!(
        "環境判定: ビルド設定を使用 -> debug_assertions={} -> {env:?}",
        cfg!(debug_assertions)
    );
    env
}

/// 環境に応じた.envファイルを読み込む
///
/// # 処理内容
/// 1. ENVIRONMENT に応じて読み込むファイルを決定
/// 2. 環境固有のファイルがなければデフォルトの.envを試行
pub fn load_environment_variables() {
    let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    let env_file = match environment.as_str() {
        "production" => ".env.production",
        _ => ".env",
    };

    log::info!("環境: {environment}, 読み込み対象: {env_file}");

    if load_environment_file(env_file) {
        return;
    }

    if env_file != ".env" && dotenv::dotenv().is_ok() {
        log::warn!("{env_file}が見つからないため、デフォルトの.envファイルを読み込みました");
        return;
    }

    log::warn!("環境変数ファイルが見つかりません。直接設定された環境変数を使用します。");
}

/// 指定された.envファイルを読み込む
///
/// # 引数
/// * `path` - .envファイルのパス
///
/// # 戻り値
/// 読み込めた場合はtrue
pub fn load_environment_file<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    match dotenv::from_path(path) {
        Ok(_) => {
            log::info!("{}ファイルを読み込みました", path.display());
            true
        }
        Err(e) => {
            log::debug!("{}ファイルを読み込めませんでした: {e}", path.display());
            false
        }
    }
}

/// ログシステムを初期化する
///
/// 既にロガーが登録されている場合（テストなど）は何もしない
pub fn initialize_logging_system() {
    let env_config = EnvironmentConfig::from_env();

    let result = env_logger::Builder::from_default_env()
        .filter_level(env_config.level_filter())
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .try_init();

    if result.is_err() {
        log::debug!("ログシステムは既に初期化されています");
        return;
    }

    log::info!(
        "ログシステムを初期化しました: level={}, environment={}",
        env_config.log_level,
        env_config.environment
    );
}

/// 領収書ファイルの受け入れポリシー
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptPolicy {
    /// 許可する拡張子（小文字、ドットなし）
    pub allowed_extensions: Vec<String>,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
        }
    }
}

impl ReceiptPolicy {
    /// 環境変数から受け入れポリシーを読み込む
    ///
    /// RECEIPT_ALLOWED_EXTENSIONS はカンマ区切り（例: "jpg,jpeg,png"）
    pub fn from_env() -> Self {
        match crate::get_env_var!("RECEIPT_ALLOWED_EXTENSIONS") {
            Ok(raw) => {
                let policy = Self::from_list(&raw);
                if policy.allowed_extensions.is_empty() {
                    log::warn!(
                        "RECEIPT_ALLOWED_EXTENSIONS が空のため、デフォルト値を使用します"
                    );
                    return Self::default();
                }
                log::debug!("領収書の許可拡張子: {:?}", policy.allowed_extensions);
                policy
            }
            Err(_) => Self::default(),
        }
    }

    /// カンマ区切りの拡張子リストからポリシーを作成する
    pub fn from_list(raw: &str) -> Self {
        let allowed_extensions = raw
            .split(',')
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { allowed_extensions }
    }

    /// 拡張子が許可されているかを判定（大文字小文字は区別しない）
    pub fn allows_extension(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.allowed_extensions.iter().any(|ext| *ext == extension)
    }
}

/// インメモリストアの設定
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// 各ストア操作に加える擬似的な遅延
    pub latency: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }
}

impl StoreConfig {
    /// 環境変数からストア設定を読み込む
    pub fn from_env() -> Self {
        let latency_ms = crate::get_env_var_or_default!("STORE_LATENCY_MS", "0")
            .parse()
            .unwrap_or_else(|_| {
                log::warn!("STORE_LATENCY_MSのパースに失敗しました。遅延なしで動作します");
                0
            });

        Self {
            latency: Duration::from_millis(latency_ms),
        }
    }
}
