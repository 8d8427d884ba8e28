use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("TableError: {0}")]
    Table(#[from] TableError),
    #[error("RealtimeError: {0}")]
    Realtime(#[from] RealtimeError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("API URL is not configured")]
    MissingApiUrl { hint: String },
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64, endpoint: String },
    #[error("HTTP error: {status} {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("Authentication failed")]
    Unauthorized {
        status: u16,
        endpoint: String,
        server_message: String,
    },
    #[error("Network error on {endpoint}: {message}")]
    Network { endpoint: String, message: String },
    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
    #[error("Seen orders file {path} is unusable: {message}")]
    SeenOrders { path: String, message: String },
    #[error("Invalid configuration value for '{field}': {value}")]
    InvalidValue { field: String, value: String },
}

/// Rejected query-state mutations and invalid table setup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Column '{column}' is not sortable")]
    NotSortable { column: String },
    #[error("Column '{column}' is not filterable")]
    NotFilterable { column: String },
    #[error("Duplicate column key '{column}'")]
    DuplicateColumn { column: String },
    #[error("Page must be 1 or greater, got {page}")]
    InvalidPage { page: usize },
    #[error("Page size must be greater than 0")]
    InvalidPageSize,
    #[error("Item height must be greater than 0")]
    InvalidItemHeight,
}

#[derive(Error, Debug)]
pub enum RealtimeError {
    #[error("Already subscribed to '{path}'")]
    AlreadySubscribed { path: String },
    #[error("Subscription to '{path}' failed: {message}")]
    SubscribeFailed { path: String, message: String },
    #[error("Malformed stream event: {message}")]
    MalformedEvent { message: String },
    #[error("Stream for '{path}' closed by server: {reason}")]
    StreamClosed { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Api(api_error) => match api_error {
                ApiError::Unauthorized { .. } => ErrorSeverity::High,
                ApiError::Timeout { .. } | ApiError::Network { .. } => ErrorSeverity::Medium,
                ApiError::Http { status, .. } if *status >= 500 => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Storage(StorageError::ConfigDirNotFound) => ErrorSeverity::Critical,
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Table(_) => ErrorSeverity::Low,
            AppError::Realtime(_) => ErrorSeverity::Medium,
        }
    }

    pub fn display_friendly(&self) -> String {
        match self {
            AppError::Cli(CliError::MissingApiUrl { hint }) => {
                format!("API URL is not configured. {}", hint)
            }
            AppError::Api(ApiError::Unauthorized { endpoint, .. }) => {
                format!("The server rejected the request to {}", endpoint)
            }
            AppError::Api(ApiError::Http {
                status, message, ..
            }) if *status == 404 => format!("Not found: {}", message),
            AppError::Table(table_error) => table_error.to_string(),
            _ => format!("{}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_for_server_errors() {
        let err = AppError::Api(ApiError::Http {
            status: 502,
            endpoint: "/api/orders".to_string(),
            message: "bad gateway".to_string(),
        });
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_table_errors_are_low_severity() {
        let err: AppError = TableError::InvalidPageSize.into();
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.display_friendly(), "Page size must be greater than 0");
    }

    #[test]
    fn test_missing_url_hint_is_shown() {
        let err = AppError::Cli(CliError::MissingApiUrl {
            hint: "Run 'dishdesk config set --api-url <url>'".to_string(),
        });
        assert!(err.display_friendly().contains("config set"));
    }
}
