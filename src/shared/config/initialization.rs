use crate::shared::config::environment::{
    get_environment, initialize_logging_system, load_environment_variables, Environment,
    EnvironmentConfig, ReceiptPolicy, StoreConfig,
};
use crate::shared::errors::{AppError, AppResult};

/// アプリケーション初期化の結果を表す構造体
#[derive(Debug, Clone)]
pub struct InitializationResult {
    /// 実行環境
    pub environment: Environment,
    /// 環境設定
    pub environment_config: EnvironmentConfig,
    /// 領収書の受け入れポリシー
    pub receipt_policy: ReceiptPolicy,
    /// ストア設定
    pub store_config: StoreConfig,
}

/// アプリケーションの初期化を実行する
///
/// # 戻り値
/// 初期化結果、または失敗時はエラー
///
/// # 処理内容
/// 1. .envファイルの読み込み
/// 2. ログシステムの初期化
/// 3. 各設定の読み込みと検証
pub fn initialize_application() -> AppResult<InitializationResult> {
    load_environment_variables();
    initialize_logging_system();

    log::info!("アプリケーション初期化を開始します...");

    let environment = get_environment();
    let environment_config = EnvironmentConfig::from_env();
    let receipt_policy = ReceiptPolicy::from_env();
    let store_config = StoreConfig::from_env();

    validate_receipt_policy(&receipt_policy)?;

    let result = InitializationResult {
        environment,
        environment_config,
        receipt_policy,
        store_config,
    };
    log_initialization_complete(&result);

    Ok(result)
}

/// 領収書ポリシーを検証する
///
/// 拡張子が空、または英数字以外を含む場合は設定エラー
fn validate_receipt_policy(policy: &ReceiptPolicy) -> AppResult<()> {
    if policy.allowed_extensions.is_empty() {
        return Err(AppError::configuration(
            "許可する領収書の拡張子が設定されていません",
        ));
    }

    if let Some(invalid) = policy
        .allowed_extensions
        .iter()
        .find(|ext| !ext.chars().all(|c| c.is_ascii_alphanumeric()))
    {
        return Err(AppError::configuration(format!(
            "領収書の拡張子が不正です: {invalid}"
        )));
    }

    Ok(())
}

/// 初期化完了ログを出力する
pub fn log_initialization_complete(result: &InitializationResult) {
    log::info!("アプリケーション初期化が完了しました");
    log::info!("環境: {:?}", result.environment);
    log::info!(
        "領収書の許可拡張子: {}",
        result.receipt_policy.allowed_extensions.join(",")
    );
    log::debug!("ストア遅延: {:?}", result.store_config.latency);
}
