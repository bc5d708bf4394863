//! An in-process stand-in for the store, speaking just enough RESP2 for the client.

#![allow(dead_code)]

use kvclient::resp::{read_frame, Frame};
use std::collections::{HashMap, VecDeque};
use std::io::{BufReader, BufWriter, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

type Data = Arc<Mutex<HashMap<(u32, Vec<u8>), Vec<u8>>>>;

#[derive(Clone)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Clone)]
enum Behaviour {
    Store(Option<Credentials>),
    // Answer each command with the next reply, whatever the command was.
    Scripted(Arc<Mutex<VecDeque<Frame>>>),
}

/// Listens on an ephemeral local port for as long as the test process lives.
pub struct FakeStore {
    addr: SocketAddr,
    data: Data,
}

impl FakeStore {
    /// A store that accepts every connection without AUTH.
    pub fn start() -> FakeStore {
        FakeStore::spawn(Behaviour::Store(None))
    }

    /// A store that rejects commands until `AUTH username password` succeeds.
    pub fn with_credentials(username: &str, password: &str) -> FakeStore {
        FakeStore::spawn(Behaviour::Store(Some(Credentials {
            username: username.to_owned(),
            password: password.to_owned(),
        })))
    }

    /// A store that sends `replies` in order, one per command, then hangs up.
    pub fn scripted(replies: Vec<Frame>) -> FakeStore {
        FakeStore::spawn(Behaviour::Scripted(Arc::new(Mutex::new(replies.into()))))
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Write a raw value straight into database 0.
    pub fn insert_raw(&self, key: &str, value: &[u8]) {
        self.data
            .lock()
            .unwrap()
            .insert((0, key.as_bytes().to_vec()), value.to_vec());
    }

    /// Read a value straight out of database `db`.
    pub fn value_in(&self, db: u32, key: &str) -> Option<Vec<u8>> {
        self.data
            .lock()
            .unwrap()
            .get(&(db, key.as_bytes().to_vec()))
            .cloned()
    }

    fn spawn(behaviour: Behaviour) -> FakeStore {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let data: Data = Arc::new(Mutex::new(HashMap::new()));

        let shared = data.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let stream = match stream {
                    Ok(stream) => stream,
                    Err(_) => continue,
                };
                let data = shared.clone();
                let behaviour = behaviour.clone();
                thread::spawn(move || match behaviour {
                    Behaviour::Store(credentials) => serve(stream, data, credentials),
                    Behaviour::Scripted(replies) => serve_scripted(stream, replies),
                });
            }
        });

        FakeStore { addr, data }
    }
}

/// A local port with nothing listening on it.
pub fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// A local port whose listener accepts every connection and closes it at once.
pub fn hang_up_on_accept() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming() {
            drop(stream);
        }
    });
    port
}

fn serve_scripted(stream: TcpStream, replies: Arc<Mutex<VecDeque<Frame>>>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut writer = BufWriter::new(stream);

    while let Ok(Some(_)) = read_frame(&mut reader) {
        let reply = match replies.lock().unwrap().pop_front() {
            Some(reply) => reply,
            None => break,
        };
        if reply.write_to(&mut writer).is_err() || writer.flush().is_err() {
            break;
        }
    }
}

fn serve(stream: TcpStream, data: Data, credentials: Option<Credentials>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut writer = BufWriter::new(stream);
    let mut authenticated = credentials.is_none();
    let mut db = 0;

    while let Ok(Some(frame)) = read_frame(&mut reader) {
        let args = match frame {
            Frame::Array(args) => args
                .into_iter()
                .map(|arg| match arg {
                    Frame::Bulk(bytes) => bytes,
                    _ => Vec::new(),
                })
                .collect::<Vec<_>>(),
            _ => break,
        };
        if args.is_empty() {
            break;
        }

        let name = String::from_utf8_lossy(&args[0]).to_uppercase();
        let reply = if name == "AUTH" {
            match (&credentials, args.len()) {
                (None, _) => Frame::Error(
                    "ERR AUTH <password> called without any password configured".to_owned(),
                ),
                (Some(c), 2) if args[1] == c.password.as_bytes() && c.username == "default" => {
                    authenticated = true;
                    ok()
                }
                (Some(c), 3)
                    if args[1] == c.username.as_bytes() && args[2] == c.password.as_bytes() =>
                {
                    authenticated = true;
                    ok()
                }
                _ => Frame::Error(
                    "WRONGPASS invalid username-password pair or user is disabled.".to_owned(),
                ),
            }
        } else if !authenticated {
            Frame::Error("NOAUTH Authentication required.".to_owned())
        } else {
            match (name.as_str(), args.len()) {
                ("PING", 1) => Frame::Simple("PONG".to_owned()),
                ("SELECT", 2) => match String::from_utf8_lossy(&args[1]).parse() {
                    Ok(index) if index < 16 => {
                        db = index;
                        ok()
                    }
                    _ => Frame::Error("ERR DB index is out of range".to_owned()),
                },
                ("SET", 3) => {
                    data.lock()
                        .unwrap()
                        .insert((db, args[1].clone()), args[2].clone());
                    ok()
                }
                ("GET", 2) => match data.lock().unwrap().get(&(db, args[1].clone())) {
                    Some(value) => Frame::Bulk(value.clone()),
                    None => Frame::Null,
                },
                ("DEL", 2) => match data.lock().unwrap().remove(&(db, args[1].clone())) {
                    Some(_) => Frame::Integer(1),
                    None => Frame::Integer(0),
                },
                _ => Frame::Error(format!("ERR unknown command '{}'", name)),
            }
        };

        if reply.write_to(&mut writer).is_err() || writer.flush().is_err() {
            break;
        }
    }
}

fn ok() -> Frame {
    Frame::Simple("OK".to_owned())
}
