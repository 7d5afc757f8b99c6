//! File locations and user settings

pub mod paths;
pub mod settings;

pub use paths::{FinancePaths, DATA_DIR_ENV};
pub use settings::Settings;
