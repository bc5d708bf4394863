use std::fmt;
use std::fmt::Display;

/// A value read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// The value decoded as UTF-8, when the connection decodes responses.
    Text(String),
    /// The raw bytes, when it does not.
    Bytes(Vec<u8>),
}

impl Value {
    /// The value as text, if it was decoded.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Bytes(_) => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
        }
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

/// The commands this client sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommandName {
    Auth,
    Select,
    Set,
    Get,
    Del,
    Ping,
}

impl CommandName {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            CommandName::Auth => "AUTH",
            CommandName::Select => "SELECT",
            CommandName::Set => "SET",
            CommandName::Get => "GET",
            CommandName::Del => "DEL",
            CommandName::Ping => "PING",
        }
    }
}

impl Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl slog::Value for CommandName {
    fn serialize(
        &self,
        _rec: &slog::Record,
        key: slog::Key,
        serializer: &mut dyn slog::Serializer,
    ) -> slog::Result {
        serializer.emit_str(key, self.as_str())
    }
}
