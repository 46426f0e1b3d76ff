use thiserror::Error;

/// Main library error type that encompasses all possible failure modes
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

/// Request construction and argument validation errors
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Missing required argument '{argument}' for action: {action}")]
    MissingArgument { action: String, argument: String },

    #[error("Unsupported argument '{argument}' for action: {action}")]
    UnsupportedArgument { action: String, argument: String },

    #[error("Unsupported value '{value}' for argument '{argument}' of action: {action}")]
    UnsupportedValue {
        action: String,
        argument: String,
        value: String,
    },

    #[error("Invalid Spotify URI: {uri}")]
    InvalidUri { uri: String },

    #[error("Invalid service base URL: {url} - {details}")]
    InvalidBaseUrl { url: String, details: String },
}

/// Network-level errors originating in the transport collaborator.
///
/// The interpreter never retries these; retry policy lives entirely in the
/// transport, so a failure surfacing here is already final.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status error: {status} for {url} - {message}")]
    HttpStatus {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Request timeout: {url} after {timeout_seconds} seconds")]
    Timeout { url: String, timeout_seconds: u64 },
}

/// Response document errors: unparseable XML, or a tree that violates the
/// document-order contiguity assumption of the flattener.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Response is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("XML parsing error: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("Inconsistent document structure: no parent record found for element '{tag}'")]
    InconsistentStructure { tag: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, LookupError>;
