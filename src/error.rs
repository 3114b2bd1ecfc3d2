use thiserror::Error;

/// Everything that can go wrong between loading the config and writing the report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkuBenchError {
    #[error("Cannot write report to '{path}': {reason}")]
    ReportWrite { path: String, reason: String },

    #[error("Cannot serialize report: {0}")]
    ReportSerialize(String),

    #[error("Cannot read config file '{path}': {reason}")]
    ConfigRead { path: String, reason: String },

    #[error("Config file '{path}' is not valid: {reason}")]
    ConfigParse { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Input is not sorted by key: element {index} is smaller than its predecessor")]
    UnsortedInput { index: usize },

    #[error("Invalid log filter: {0}")]
    LogFilter(String),
}

impl SkuBenchError {
    /// The file path involved in the failure, if there is one.
    pub fn path(&self) -> Option<&str> {
        match self {
            SkuBenchError::ReportWrite { path, .. } => Some(path),
            SkuBenchError::ConfigRead { path, .. } => Some(path),
            SkuBenchError::ConfigParse { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Short machine-friendly tag, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            SkuBenchError::ReportWrite { .. } => "report_write",
            SkuBenchError::ReportSerialize(_) => "report_serialize",
            SkuBenchError::ConfigRead { .. } => "config_read",
            SkuBenchError::ConfigParse { .. } => "config_parse",
            SkuBenchError::InvalidConfig(_) => "invalid_config",
            SkuBenchError::UnsortedInput { .. } => "unsorted_input",
            SkuBenchError::LogFilter(_) => "log_filter",
        }
    }
}

pub type SkuBenchResult<T> = Result<T, SkuBenchError>;
