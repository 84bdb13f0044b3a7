/// 共有エラー型とエラーハンドリング
pub mod errors;

/// 共有設定管理
pub mod config;

/// コントローラーの実行コンテキスト
pub mod context;

/// 表示用の書式変換
pub mod format;

/// 識別情報キャッシュ
pub mod identity;

/// ストアインターフェース
pub mod store;

/// 共有ユーティリティ関数
pub mod utils;

// 便利な再エクスポート
pub use config::{
    get_environment, initialize_application, initialize_logging_system,
    load_environment_variables, Environment, EnvironmentConfig, InitializationResult,
    ReceiptPolicy, StoreConfig,
};
pub use context::AppContext;
pub use errors::{AppError, AppResult, ErrorSeverity};
pub use format::{FrenchRecordFormatter, RecordFormatter};
pub use identity::{CachedUser, IdentityCache, UserType};
pub use store::{BillsResource, ReceiptUpload, Store, UploadedReceipt};
