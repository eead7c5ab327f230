//! Error types
use std::result;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The device could not be reached: name resolution, refused connection, timeout.
    #[error("Error connecting to the device")]
    Connection(#[source] reqwest::Error),
    /// The device answered, but not with something usable.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("Invalid device address {host:?}: {reason}")]
    InvalidAddress { host: String, reason: String },
    #[error("{0}")]
    InvalidArgument(String),
}

impl Error {
    /// True when retrying the same request could succeed.
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::Protocol(_))
    }
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Device responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Could not parse the response received from the device")]
    Json(#[source] serde_json::Error),
    #[error("Relay {0} is not reported by the device")]
    MissingRelay(u32),
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Connection(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Protocol(ProtocolError::Json(error))
    }
}

pub type Result<T> = result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_are_protocol_errors() {
        let err: Error = serde_json::from_str::<serde_json::Value>("<html>")
            .unwrap_err()
            .into();

        assert!(err.is_protocol());
        assert!(!err.is_connection());
        assert_eq!(
            "Could not parse the response received from the device",
            err.to_string()
        );
    }

    #[test]
    fn status_error_keeps_device_payload() {
        let err = Error::from(ProtocolError::Status {
            status: 404,
            body: String::from("Not Found"),
        });

        assert_eq!("Device responded with HTTP 404: Not Found", err.to_string());
    }
}
