//! RESP2 framing.

use crate::errors::StoreError;
use crate::Result;
use std::fmt;
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str;

const CRLF: &[u8] = b"\r\n";
// Largest bulk string the store will hand out.
const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

/// A single RESP2 value, as sent by either side of a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// `+OK`
    Simple(String),
    /// `-ERR message`
    Error(String),
    /// `:1`
    Integer(i64),
    /// `$3\r\nbar`
    Bulk(Vec<u8>),
    /// `*2\r\n...`
    Array(Vec<Frame>),
    /// `$-1` or `*-1`
    Null,
}

impl Frame {
    /// Serialise this frame onto `writer`. Does not flush.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Frame::Simple(s) => write!(writer, "+{}\r\n", s)?,
            Frame::Error(msg) => write!(writer, "-{}\r\n", msg)?,
            Frame::Integer(n) => write!(writer, ":{}\r\n", n)?,
            Frame::Bulk(data) => {
                write!(writer, "${}\r\n", data.len())?;
                writer.write_all(data)?;
                writer.write_all(CRLF)?;
            }
            Frame::Array(frames) => {
                write!(writer, "*{}\r\n", frames.len())?;
                for frame in frames {
                    frame.write_to(writer)?;
                }
            }
            Frame::Null => writer.write_all(b"$-1\r\n")?,
        }
        Ok(())
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Simple(s) => write!(f, "{}", s),
            Frame::Error(msg) => write!(f, "(error) {}", msg),
            Frame::Integer(n) => write!(f, "(integer) {}", n),
            Frame::Bulk(data) => write!(f, "\"{}\"", String::from_utf8_lossy(data)),
            Frame::Array(frames) => {
                write!(f, "[")?;
                for (i, frame) in frames.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", frame)?;
                }
                write!(f, "]")
            }
            Frame::Null => write!(f, "(nil)"),
        }
    }
}

/// Render a command as an array of bulk strings.
pub fn encode_command<A: AsRef<[u8]>>(args: &[A]) -> Vec<u8> {
    let payload: usize = args.iter().map(|a| a.as_ref().len() + 16).sum();
    let mut buf = Vec::with_capacity(16 + payload);
    buf.extend_from_slice(format!("*{}\r\n", args.len()).as_bytes());
    for arg in args {
        let arg = arg.as_ref();
        buf.extend_from_slice(format!("${}\r\n", arg.len()).as_bytes());
        buf.extend_from_slice(arg);
        buf.extend_from_slice(CRLF);
    }
    buf
}

/// Read one frame. `Ok(None)` means the peer closed the connection cleanly
/// between frames.
pub fn read_frame<R: BufRead>(reader: &mut R) -> Result<Option<Frame>> {
    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }
    parse_frame(reader, line).map(Some)
}

fn parse_frame<R: BufRead>(reader: &mut R, line: Vec<u8>) -> Result<Frame> {
    let body = strip_crlf(&line)?;
    let (&kind, rest) = match body.split_first() {
        Some(split) => split,
        None => return Err(StoreError::protocol("empty frame").into()),
    };

    match kind {
        b'+' => Ok(Frame::Simple(utf8(rest)?.to_owned())),
        b'-' => Ok(Frame::Error(utf8(rest)?.to_owned())),
        b':' => Ok(Frame::Integer(parse_int(rest)?)),
        b'$' => {
            let len = parse_len(rest)?;
            if len == -1 {
                return Ok(Frame::Null);
            }
            if len > MAX_BULK_LEN {
                let reason = format!("bulk string of {} bytes is too large", len);
                return Err(StoreError::protocol(reason).into());
            }
            let mut data = vec![0; len as usize + CRLF.len()];
            reader
                .read_exact(&mut data)
                .map_err(|_| StoreError::protocol("connection reset mid-frame"))?;
            if !data.ends_with(CRLF) {
                return Err(StoreError::protocol("bulk string not terminated by CRLF").into());
            }
            data.truncate(len as usize);
            Ok(Frame::Bulk(data))
        }
        b'*' => {
            let len = parse_len(rest)?;
            if len == -1 {
                return Ok(Frame::Null);
            }
            let mut frames = Vec::with_capacity(len.min(1024) as usize);
            for _ in 0..len {
                match read_frame(reader)? {
                    Some(frame) => frames.push(frame),
                    None => {
                        return Err(StoreError::protocol("connection reset mid-frame").into())
                    }
                }
            }
            Ok(Frame::Array(frames))
        }
        other => {
            let reason = format!("unknown frame type '{}'", other as char);
            Err(StoreError::protocol(reason).into())
        }
    }
}

fn strip_crlf(line: &[u8]) -> Result<&[u8]> {
    if line.ends_with(CRLF) {
        Ok(&line[..line.len() - CRLF.len()])
    } else if line.ends_with(b"\n") {
        Err(StoreError::protocol("line not terminated by CRLF").into())
    } else {
        // read_until stopped at EOF instead of a newline
        Err(StoreError::protocol("connection reset mid-frame").into())
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    str::from_utf8(bytes).map_err(|_| StoreError::protocol("line is not valid UTF-8").into())
}

// Lengths are non-negative, or -1 for null.
fn parse_len(bytes: &[u8]) -> Result<i64> {
    let len = parse_int(bytes)?;
    if len < -1 {
        let reason = format!("invalid length {}", len);
        return Err(StoreError::protocol(reason).into());
    }
    Ok(len)
}

fn parse_int(bytes: &[u8]) -> Result<i64> {
    utf8(bytes)?.parse().map_err(|_| {
        let reason = format!("invalid integer '{}'", String::from_utf8_lossy(bytes));
        StoreError::protocol(reason).into()
    })
}
