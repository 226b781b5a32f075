use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExcuseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Template error: {message}")]
    TemplateError { message: String },

    #[error("Nothing to rephrase yet")]
    NothingToRephrase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Template,
    Storage,
    Usage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status for a failed command.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ExcuseError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExcuseError::IoError(_) | ExcuseError::SerializationError(_) => ErrorCategory::Storage,
            ExcuseError::ConfigError { .. }
            | ExcuseError::ConfigValidationError { .. }
            | ExcuseError::InvalidConfigValueError { .. }
            | ExcuseError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ExcuseError::TemplateError { .. } => ErrorCategory::Template,
            ExcuseError::NothingToRephrase => ErrorCategory::Usage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Usage => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Template => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ExcuseError::IoError(_) => {
                "Check that the history folder exists and is writable".to_string()
            }
            ExcuseError::SerializationError(_) => {
                "A history file may be corrupted; inspect the .jsonl files in the history folder"
                    .to_string()
            }
            ExcuseError::ConfigError { .. } | ExcuseError::ConfigValidationError { .. } => {
                "Fix the configuration file and make sure it is valid TOML".to_string()
            }
            ExcuseError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            ExcuseError::MissingConfigError { field } => {
                format!("Set '{}' on the command line or in the config file", field)
            }
            ExcuseError::TemplateError { .. } => {
                "Templates may only use {action}, {deliverable}, {event}, {timeframe}, {new_time}, {notes}, {audience} and {scenario}"
                    .to_string()
            }
            ExcuseError::NothingToRephrase => {
                "Run 'generate' first (with --save to keep it between runs)".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ExcuseError::IoError(e) => format!("Could not access history: {}", e),
            ExcuseError::SerializationError(e) => format!("Could not read history: {}", e),
            ExcuseError::InvalidConfigValueError { field, value, reason } => {
                format!("'{}' is not a valid {}: {}", value, field, reason)
            }
            ExcuseError::NothingToRephrase => {
                "There is no excuse to rephrase yet.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExcuseError>;
