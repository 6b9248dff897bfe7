//! Errors returned by the OpenTrack client

use otsoap::{ErrorRecord, SoapFault, SoapParseError};
use thiserror::Error;

/// Result type of the OpenTrack client
pub type Result<T> = std::result::Result<T, OpenTrackError>;

/// Broad class of an [`OpenTrackError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input: session settings, configuration or request content
    Argument,
    /// Network or HTTP failure
    Transport,
    /// The DMS rejected the call (error marker, SOAP fault, non-2xx status)
    Protocol,
    /// The response does not have the expected number of parts or records
    Shape,
    /// The response could not be read
    Malformed,
}

#[derive(Error, Debug)]
pub enum OpenTrackError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Invalid request XML: {0}")]
    InvalidRequest(String),

    #[error("Failed to serialize SOAP envelope: {0}")]
    Serialize(#[from] xmltree::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error(transparent)]
    Dms(#[from] ErrorRecord),

    #[error("SOAP fault (HTTP status {status}): {fault}")]
    SoapFault {
        status: u16,
        fault: SoapFault,
        raw: String,
    },

    #[error("HTTP status {status}: {raw}")]
    HttpStatus { status: u16, raw: String },

    #[error("Response payload carries no content")]
    EmptyPayload,

    #[error("Expected {expected} {element}, found {found}")]
    UnexpectedCount {
        element: String,
        expected: &'static str,
        found: usize,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] SoapParseError),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl OpenTrackError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn unexpected_response(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_)
            | Self::Config(_)
            | Self::InvalidRequest(_)
            | Self::Serialize(_) => ErrorKind::Argument,
            Self::Http(_) => ErrorKind::Transport,
            Self::Dms(_) | Self::SoapFault { .. } | Self::HttpStatus { .. } => ErrorKind::Protocol,
            Self::EmptyPayload | Self::UnexpectedCount { .. } => ErrorKind::Shape,
            Self::MalformedResponse(_) | Self::UnexpectedResponse(_) => ErrorKind::Malformed,
        }
    }

    /// DMS error record, for errors reported inside a response
    pub fn error_record(&self) -> Option<&ErrorRecord> {
        match self {
            Self::Dms(record) => Some(record),
            _ => None,
        }
    }

    /// Raw response text carried by SOAP faults and HTTP status errors
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::SoapFault { raw, .. } | Self::HttpStatus { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmltree::Element;

    #[test]
    fn test_kinds() {
        assert_eq!(
            OpenTrackError::invalid_argument("empty username").kind(),
            ErrorKind::Argument
        );
        assert_eq!(OpenTrackError::EmptyPayload.kind(), ErrorKind::Shape);
        assert_eq!(
            OpenTrackError::HttpStatus {
                status: 500,
                raw: String::new()
            }
            .kind(),
            ErrorKind::Protocol
        );
        assert_eq!(
            OpenTrackError::from(SoapParseError::MissingBody).kind(),
            ErrorKind::Malformed
        );
    }

    #[test]
    fn test_dms_error_keeps_record() {
        let record = ErrorRecord {
            code: "1001".to_string(),
            message: "Dealer not found".to_string(),
            xml: Element::new("Root"),
        };
        let err = OpenTrackError::from(record);

        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_eq!(err.error_record().unwrap().code, "1001");
        assert_eq!(err.to_string(), "OpenTrack error 1001: Dealer not found");
    }
}
