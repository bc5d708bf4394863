use crate::errors::StoreError;
use crate::Result;
use std::fmt;

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Standard port of the store.
pub const DEFAULT_PORT: u16 = 6379;
// `DEFAULT_PORT` as a clap default value.
pub(crate) const DEFAULT_PORT_STR: &str = "6379";

/// Everything needed to open a session with the store.
///
/// # Examples
///
/// ```
/// let params = kvclient::ConnectionParams::new("localhost", 6379)
///     .with_credentials("default", "secret")
///     .decode_responses(true);
///
/// assert_eq!(params.addr(), "localhost:6379");
/// ```
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<String>,
    db: u32,
    decode_responses: bool,
}

impl ConnectionParams {
    /// Parameters for an unauthenticated connection to `host:port`, database 0,
    /// with responses decoded to text.
    pub fn new(host: impl Into<String>, port: u16) -> ConnectionParams {
        ConnectionParams {
            host: host.into(),
            port,
            username: None,
            password: None,
            db: 0,
            decode_responses: true,
        }
    }

    /// Authenticate as `username` with `password` (ACL style).
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> ConnectionParams {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Authenticate with a password only, as the default user.
    pub fn with_password(mut self, password: impl Into<String>) -> ConnectionParams {
        self.password = Some(password.into());
        self
    }

    /// Select a logical database after connecting.
    pub fn with_db(mut self, db: u32) -> ConnectionParams {
        self.db = db;
        self
    }

    /// Return values as `Value::Text` (true) or `Value::Bytes` (false).
    pub fn decode_responses(mut self, decode: bool) -> ConnectionParams {
        self.decode_responses = decode;
        self
    }

    #[allow(missing_docs)]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[allow(missing_docs)]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[allow(missing_docs)]
    pub fn username(&self) -> Option<&str> {
        self.username.as_ref().map(String::as_str)
    }

    #[allow(missing_docs)]
    pub fn password(&self) -> Option<&str> {
        self.password.as_ref().map(String::as_str)
    }

    #[allow(missing_docs)]
    pub fn db(&self) -> u32 {
        self.db
    }

    #[allow(missing_docs)]
    pub fn decodes_responses(&self) -> bool {
        self.decode_responses
    }

    /// The endpoint, formatted as `host:port`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject parameters that can never describe a reachable endpoint.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(StoreError::InvalidParams {
                reason: "host must not be empty".to_owned(),
            }
            .into());
        }
        if self.port == 0 {
            return Err(StoreError::InvalidParams {
                reason: "port must be between 1 and 65535".to_owned(),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for ConnectionParams {
    fn default() -> Self {
        ConnectionParams::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

// The password stays out of logs and panic messages.
impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("db", &self.db)
            .field("decode_responses", &self.decode_responses)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = ConnectionParams::default();
        assert_eq!(params.addr(), "127.0.0.1:6379");
        assert_eq!(params.db(), 0);
        assert!(params.decodes_responses());
        assert_eq!(params.username(), None);
        assert_eq!(params.password(), None);
    }

    #[test]
    fn default_port_string_matches() {
        assert_eq!(DEFAULT_PORT_STR.parse::<u16>().unwrap(), DEFAULT_PORT);
    }

    #[test]
    fn empty_host_is_invalid() {
        let err = ConnectionParams::new("  ", 6379).validate().unwrap_err();
        match err.downcast::<StoreError>() {
            Ok(StoreError::InvalidParams { .. }) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn port_zero_is_invalid() {
        assert!(ConnectionParams::new("localhost", 0).validate().is_err());
        assert!(ConnectionParams::new("localhost", 1).validate().is_ok());
    }

    #[test]
    fn debug_hides_password() {
        let params = ConnectionParams::default().with_credentials("default", "hunter2");
        let printed = format!("{:?}", params);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("default"));
    }
}
