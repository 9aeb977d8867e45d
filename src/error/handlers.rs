//! Error handlers
//!
//! Provides error reporting and status-code mapping for the document protocol.

use crate::error::types::{DocbridgeError, ProviderError};
use log::error;

/// Handle a docbridge error
pub fn handle_error(err: &DocbridgeError) {
    error!("docbridge error: {}", err);
}

/// Convert error to protocol status code
pub fn error_to_status_code(err: &DocbridgeError) -> u16 {
    match err {
        DocbridgeError::Provider(ProviderError::NotFound(_)) => 550,
        DocbridgeError::Provider(ProviderError::Failure(_)) => 450,
        DocbridgeError::Bridge(_) => 450,
        DocbridgeError::Protocol(crate::error::ProtocolError::UnknownCommand(_)) => 500,
        DocbridgeError::Protocol(crate::error::ProtocolError::LineTooLong(_)) => 500,
        DocbridgeError::Protocol(crate::error::ProtocolError::MissingArgument(_)) => 501,
        DocbridgeError::Config(_) => 421,
        DocbridgeError::IoError(_) => 451,
    }
}
