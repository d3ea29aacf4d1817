use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Shapefile error: {0}")]
    ShapefileError(#[from] shapefile::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing column '{column}' in {source_name}")]
    MissingColumnError { column: String, source_name: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("no hay filas para calcular estadísticas")]
    EmptyTable,

    #[error("dataset has already been published")]
    AlreadyPublished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Data,
    Runtime,
}

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::CsvError(_)
            | Self::ShapefileError(_)
            | Self::IoError(_)
            | Self::SerializationError(_)
            | Self::MissingColumnError { .. } => ErrorCategory::Input,
            Self::ProcessingError { .. } | Self::ValidationError { .. } | Self::EmptyTable => {
                ErrorCategory::Data
            }
            Self::AlreadyPublished => ErrorCategory::Runtime,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Input => format!("Could not read input data: {}", self),
            ErrorCategory::Data => format!("Input data is not usable: {}", self),
            ErrorCategory::Runtime => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::IoError(_) => "Check that the input files exist and --data-dir points at them",
            Self::ShapefileError(_) => {
                "Make sure the .shp file has its .shx and .dbf siblings next to it"
            }
            Self::MissingColumnError { .. } => {
                "Check --code-column / --name-column / --geometry-key against the file headers"
            }
            Self::CsvError(_) | Self::SerializationError(_) => {
                "Verify the file is well-formed and UTF-8 encoded"
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Review the command line flags and the TOML config file"
            }
            Self::ProcessingError { .. } | Self::ValidationError { .. } | Self::EmptyTable => {
                "Fix the offending rows in the input data and restart"
            }
            Self::AlreadyPublished => "Restart the process to load the data again",
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
