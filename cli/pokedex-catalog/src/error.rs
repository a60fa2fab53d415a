//! Error handling for catalog API operations.

use reqwest::StatusCode;
use thiserror::Error;

/// Coarse classification of a [`CatalogClientError`].
///
/// Consumers show every kind the same way; the kind only matters for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The catalog could not be reached or did not answer successfully.
    Network,
    /// The catalog answered with a payload that does not match its schema.
    Decode,
    /// The request could not be built, e.g. a malformed base URL.
    InvalidRequest,
}

/// Common error type for catalog API operations.
#[derive(Debug, Error)]
pub enum CatalogClientError {
    #[error("invalid catalog request: {0}")]
    InvalidRequest(String),
    #[error("failed to reach the catalog: {0}")]
    Network(#[source] reqwest::Error),
    #[error("catalog responded with '{status}' for {url}")]
    UnexpectedStatus { status: StatusCode, url: String },
    #[error("failed to decode catalog response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl CatalogClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogClientError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            CatalogClientError::Network(_) | CatalogClientError::UnexpectedStatus { .. } => {
                ErrorKind::Network
            },
            CatalogClientError::Decode(_) => ErrorKind::Decode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_status_is_a_network_error() {
        let err = CatalogClientError::UnexpectedStatus {
            status: StatusCode::SERVICE_UNAVAILABLE,
            url: "https://pokeapi.co/api/v2/pokemon".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(
            err.to_string(),
            "catalog responded with '503 Service Unavailable' for https://pokeapi.co/api/v2/pokemon"
        );
    }

    #[test]
    fn decode_errors_keep_serde_message() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CatalogClientError::Decode(source);
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().starts_with("failed to decode catalog response: "));
    }
}
