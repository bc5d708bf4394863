use failure;
use std::result;

/// Convenience Result type.
pub type Result<T> = result::Result<T, failure::Error>;

/// Errors
#[derive(Debug, Clone, PartialEq, Eq, failure::Fail)]
pub enum StoreError {
    /// The connection parameters can never describe a reachable endpoint
    #[fail(display = "Invalid connection parameters: {}", reason)]
    InvalidParams {
        #[allow(missing_docs)]
        reason: String,
    },

    /// The endpoint could not be reached
    #[fail(display = "Error connecting to {}: {}", addr, reason)]
    Connection {
        #[allow(missing_docs)]
        addr: String,
        #[allow(missing_docs)]
        reason: String,
    },

    /// The server rejected the credentials
    #[fail(display = "Authentication failed: {}", reason)]
    AuthenticationFailed {
        #[allow(missing_docs)]
        reason: String,
    },

    /// The server answered a command with an error reply
    #[fail(display = "{}", message)]
    Server {
        #[allow(missing_docs)]
        message: String,
    },

    /// The server answered with a reply of the wrong type for the command
    #[fail(display = "Unexpected response to {}", command)]
    UnexpectedResponse {
        #[allow(missing_docs)]
        command: String,
    },

    /// The server closed the connection before a reply arrived
    #[fail(display = "No response from server")]
    NoResponse,

    /// A value could not be decoded to text
    #[fail(display = "Value for '{}' is not valid UTF-8", key)]
    Decode {
        #[allow(missing_docs)]
        key: String,
    },

    /// The bytes on the wire are not valid RESP
    #[fail(display = "Protocol error: {}", reason)]
    Protocol {
        #[allow(missing_docs)]
        reason: String,
    },
}

impl StoreError {
    /// Was the session refused or lost, rather than a command rejected?
    pub fn is_connection_error(&self) -> bool {
        match self {
            StoreError::Connection { .. }
            | StoreError::AuthenticationFailed { .. }
            | StoreError::NoResponse => true,
            _ => false,
        }
    }

    pub(crate) fn protocol(reason: impl Into<String>) -> StoreError {
        StoreError::Protocol {
            reason: reason.into(),
        }
    }
}
