//! Error types
//!
//! Defines domain-specific error types for each module of docbridge.

use std::fmt;
use std::io;

/// Tree-browsing provider errors
#[derive(Debug)]
pub enum ProviderError {
    /// The document does not exist or lies outside the permitted subtree.
    NotFound(String),
    /// A creation, deletion or rename could not complete.
    Failure(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::NotFound(p) => write!(f, "Document not found: {}", p),
            ProviderError::Failure(msg) => write!(f, "Operation failed: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Errors raised by a content resolver implementation
#[derive(Debug)]
pub enum ResolverError {
    PermissionDenied(String),
    NotFound(String),
    /// The address is malformed or names something the resolver cannot serve.
    InvalidArgument(String),
    Io(io::Error),
}

impl fmt::Display for ResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverError::PermissionDenied(a) => write!(f, "Permission denied: {}", a),
            ResolverError::NotFound(a) => write!(f, "No such document: {}", a),
            ResolverError::InvalidArgument(a) => write!(f, "Invalid address: {}", a),
            ResolverError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ResolverError {}

impl From<io::Error> for ResolverError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => ResolverError::PermissionDenied(error.to_string()),
            io::ErrorKind::NotFound => ResolverError::NotFound(error.to_string()),
            _ => ResolverError::Io(error),
        }
    }
}

/// Scoped storage bridge errors
///
/// Internal to the bridge: public bridge operations collapse these into
/// sentinel values before returning.
#[derive(Debug)]
pub enum BridgeError {
    NotFound(String),
    PermissionDenied(String),
    Failure(String),
    Resolver(ResolverError),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::NotFound(a) => write!(f, "Not found: {}", a),
            BridgeError::PermissionDenied(a) => write!(f, "Permission denied: {}", a),
            BridgeError::Failure(msg) => write!(f, "Bridge operation failed: {}", msg),
            BridgeError::Resolver(e) => write!(f, "Resolver error: {}", e),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<ResolverError> for BridgeError {
    fn from(error: ResolverError) -> Self {
        match error {
            ResolverError::PermissionDenied(a) => BridgeError::PermissionDenied(a),
            ResolverError::NotFound(a) => BridgeError::NotFound(a),
            other => BridgeError::Resolver(other),
        }
    }
}

impl From<io::Error> for BridgeError {
    fn from(error: io::Error) -> Self {
        BridgeError::from(ResolverError::from(error))
    }
}

/// Protocol-level errors raised while decoding a client request
#[derive(Debug)]
pub enum ProtocolError {
    UnknownCommand(String),
    MissingArgument(&'static str),
    LineTooLong(usize),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::UnknownCommand(c) => write!(f, "Unknown command: {}", c),
            ProtocolError::MissingArgument(a) => write!(f, "Missing argument: {}", a),
            ProtocolError::LineTooLong(n) => write!(f, "Command line too long: {} bytes", n),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// General error that encompasses all docbridge error types
#[derive(Debug)]
pub enum DocbridgeError {
    Provider(ProviderError),
    Bridge(BridgeError),
    Protocol(ProtocolError),
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for DocbridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocbridgeError::Provider(e) => write!(f, "Provider error: {}", e),
            DocbridgeError::Bridge(e) => write!(f, "Bridge error: {}", e),
            DocbridgeError::Protocol(e) => write!(f, "Protocol error: {}", e),
            DocbridgeError::Config(e) => write!(f, "Configuration error: {}", e),
            DocbridgeError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for DocbridgeError {}

impl From<ProviderError> for DocbridgeError {
    fn from(error: ProviderError) -> Self {
        DocbridgeError::Provider(error)
    }
}

impl From<BridgeError> for DocbridgeError {
    fn from(error: BridgeError) -> Self {
        DocbridgeError::Bridge(error)
    }
}

impl From<ProtocolError> for DocbridgeError {
    fn from(error: ProtocolError) -> Self {
        DocbridgeError::Protocol(error)
    }
}

impl From<config::ConfigError> for DocbridgeError {
    fn from(error: config::ConfigError) -> Self {
        DocbridgeError::Config(error)
    }
}

impl From<io::Error> for DocbridgeError {
    fn from(error: io::Error) -> Self {
        DocbridgeError::IoError(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_permission_denied_maps_to_resolver_permission_denied() {
        let err = ResolverError::from(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, ResolverError::PermissionDenied(_)));

        let bridged = BridgeError::from(err);
        assert!(matches!(bridged, BridgeError::PermissionDenied(_)));
    }

    #[test]
    fn other_io_errors_stay_unclassified() {
        let err = BridgeError::from(io::Error::other("disk on fire"));
        assert!(matches!(err, BridgeError::Resolver(ResolverError::Io(_))));
    }
}
