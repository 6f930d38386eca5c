use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Retrieving the feed or the sanctions document failed
    #[error("Fetch error: {0}")]
    FetchError(String),
    /// The document is not in the expected export shape
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Writing CSV output failed
    #[error("Export error: {0}")]
    ExportError(String),
    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    UrlError(String),
    /// Invalid input format
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(String),
}

impl AppError {
    /// Short label telling the user whether the network or the data is at fault.
    pub fn category(&self) -> &'static str {
        match self {
            AppError::FetchError(_) => "network",
            AppError::ParseError(_) => "data",
            AppError::ExportError(_) | AppError::IoError(_) => "output",
            AppError::UrlError(_) | AppError::InvalidInput(_) => "input",
        }
    }
}

// Conversion implementations for common errors
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::FetchError(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::UrlError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::ExportError(err.to_string())
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;
