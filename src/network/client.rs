use super::data::{CommandName, Value};
use super::resp::{encode_command, read_frame, Frame};
use crate::errors::StoreError;
use crate::params::ConnectionParams;
use crate::Result;
use slog::Logger;
use std::io;
use std::io::{BufReader, BufWriter, Write};
use std::net::TcpStream;

/// A single session with the key-value store.
///
/// Every operation is one blocking round trip on the same TCP connection,
/// which is closed when the client is dropped.
///
/// # Examples
///
/// ```no_run
/// use kvclient::{ConnectionParams, StoreClient};
///
/// let params = ConnectionParams::new("127.0.0.1", 6379).with_credentials("default", "secret");
/// let mut client = StoreClient::connect(&params)?;
///
/// assert!(client.set("foo", "bar")?);
/// assert_eq!(client.get("foo")?.unwrap(), "bar");
/// # Ok::<(), failure::Error>(())
/// ```
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct StoreClient {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    addr: String,
    decode_responses: bool,
    log: Logger,
}

impl StoreClient {
    /// Open a connection, authenticate and select the database described by `params`.
    pub fn connect(params: &ConnectionParams) -> Result<StoreClient> {
        StoreClient::connect_with_logger(params, Logger::root(slog::Discard, o!()))
    }

    /// As `connect`, logging to a child of `log`.
    pub fn connect_with_logger(params: &ConnectionParams, log: Logger) -> Result<StoreClient> {
        params.validate()?;

        let addr = params.addr();
        let log = log.new(o!("addr" => addr.clone()));

        let stream = TcpStream::connect((params.host(), params.port())).map_err(|e| {
            StoreError::Connection {
                addr: addr.clone(),
                reason: e.to_string(),
            }
        })?;
        let reader = stream.try_clone().map_err(|e| StoreError::Connection {
            addr: addr.clone(),
            reason: e.to_string(),
        })?;

        let mut client = StoreClient {
            reader: BufReader::new(reader),
            writer: BufWriter::new(stream),
            addr,
            decode_responses: params.decodes_responses(),
            log,
        };

        if let Some(password) = params.password() {
            client.auth(params.username(), password)?;
        }
        if params.db() != 0 {
            client.select(params.db())?;
        }

        info!(client.log, "Connected"; "db" => params.db(), "user" => params.username().unwrap_or("default"));
        Ok(client)
    }

    /// Set `key` to `value`. True when the store acknowledged the write.
    pub fn set(&mut self, key: &str, value: &str) -> Result<bool> {
        debug!(self.log, "Sending command"; "cmd" => CommandName::Set, "key" => key);

        match self.request(CommandName::Set, &[key, value])? {
            Frame::Simple(ref status) if status == "OK" => Ok(true),
            Frame::Null => Ok(false),
            Frame::Error(message) => Err(StoreError::Server { message }.into()),
            _ => Err(unexpected(CommandName::Set)),
        }
    }

    /// Get the value for `key`, if it has one.
    pub fn get(&mut self, key: &str) -> Result<Option<Value>> {
        debug!(self.log, "Sending command"; "cmd" => CommandName::Get, "key" => key);

        match self.request(CommandName::Get, &[key])? {
            Frame::Bulk(data) => self.decode(key, data).map(Some),
            Frame::Null => Ok(None),
            Frame::Error(message) => Err(StoreError::Server { message }.into()),
            _ => Err(unexpected(CommandName::Get)),
        }
    }

    /// Remove `key`. False if it did not exist.
    pub fn delete(&mut self, key: &str) -> Result<bool> {
        debug!(self.log, "Sending command"; "cmd" => CommandName::Del, "key" => key);

        match self.request(CommandName::Del, &[key])? {
            Frame::Integer(removed) => Ok(removed > 0),
            Frame::Error(message) => Err(StoreError::Server { message }.into()),
            _ => Err(unexpected(CommandName::Del)),
        }
    }

    /// Check the session is alive.
    pub fn ping(&mut self) -> Result<bool> {
        debug!(self.log, "Sending command"; "cmd" => CommandName::Ping);

        let no_args: [&str; 0] = [];
        match self.request(CommandName::Ping, &no_args)? {
            Frame::Simple(reply) => Ok(reply == "PONG"),
            Frame::Error(message) => Err(StoreError::Server { message }.into()),
            _ => Err(unexpected(CommandName::Ping)),
        }
    }

    fn auth(&mut self, username: Option<&str>, password: &str) -> Result<()> {
        debug!(self.log, "Authenticating"; "user" => username.unwrap_or("default"));

        let args: Vec<&str> = username.into_iter().chain(Some(password)).collect();
        match self.request(CommandName::Auth, &args)? {
            Frame::Simple(_) => Ok(()),
            Frame::Error(reason) => Err(StoreError::AuthenticationFailed { reason }.into()),
            _ => Err(unexpected(CommandName::Auth)),
        }
    }

    fn select(&mut self, db: u32) -> Result<()> {
        debug!(self.log, "Sending command"; "cmd" => CommandName::Select, "db" => db);

        match self.request(CommandName::Select, &[db.to_string()])? {
            Frame::Simple(_) => Ok(()),
            Frame::Error(message) => Err(StoreError::Server { message }.into()),
            _ => Err(unexpected(CommandName::Select)),
        }
    }

    fn request<A: AsRef<[u8]>>(&mut self, name: CommandName, args: &[A]) -> Result<Frame> {
        let mut parts: Vec<&[u8]> = Vec::with_capacity(args.len() + 1);
        parts.push(name.as_str().as_bytes());
        parts.extend(args.iter().map(AsRef::as_ref));

        let sent = self
            .writer
            .write_all(&encode_command(&parts))
            .and_then(|()| self.writer.flush());
        if let Err(e) = sent {
            return Err(self.connection_lost(&e));
        }

        let reply = match read_frame(&mut self.reader) {
            Ok(reply) => reply,
            Err(e) => match e.downcast::<io::Error>() {
                Ok(io_err) => return Err(self.connection_lost(&io_err)),
                Err(e) => return Err(e),
            },
        };

        match reply {
            Some(frame) => {
                trace!(self.log, "Received reply"; "cmd" => name, "reply" => %frame);
                Ok(frame)
            }
            None => Err(StoreError::NoResponse.into()),
        }
    }

    fn connection_lost(&self, e: &io::Error) -> failure::Error {
        warn!(self.log, "Connection lost"; "error" => %e);
        StoreError::Connection {
            addr: self.addr.clone(),
            reason: e.to_string(),
        }
        .into()
    }

    fn decode(&self, key: &str, data: Vec<u8>) -> Result<Value> {
        if !self.decode_responses {
            return Ok(Value::Bytes(data));
        }
        String::from_utf8(data).map(Value::Text).map_err(|_| {
            StoreError::Decode {
                key: key.to_owned(),
            }
            .into()
        })
    }
}

fn unexpected(command: CommandName) -> failure::Error {
    StoreError::UnexpectedResponse {
        command: command.to_string(),
    }
    .into()
}
