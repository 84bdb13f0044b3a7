pub mod environment;
pub mod initialization;

pub use environment::{
    get_environment, initialize_logging_system, load_environment_file,
    load_environment_variables, Environment, EnvironmentConfig, ReceiptPolicy, StoreConfig,
};
pub use initialization::{initialize_application, log_initialization_complete, InitializationResult};
