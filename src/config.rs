//! Connection settings shared by the binaries.
//!
//! Every setting can come from a flag, an environment variable or a default,
//! in that order of precedence.

use crate::params::{ConnectionParams, DEFAULT_HOST, DEFAULT_PORT_STR};
use crate::Result;
use clap::{value_t, Arg, ArgMatches};
use slog::{Drain, Level, Logger};

#[allow(missing_docs)]
pub const HOST_ENV: &str = "KVCLIENT_HOST";
#[allow(missing_docs)]
pub const PORT_ENV: &str = "KVCLIENT_PORT";
#[allow(missing_docs)]
pub const USERNAME_ENV: &str = "KVCLIENT_USERNAME";
#[allow(missing_docs)]
pub const PASSWORD_ENV: &str = "KVCLIENT_PASSWORD";
#[allow(missing_docs)]
pub const DB_ENV: &str = "KVCLIENT_DB";

/// Flags describing how to reach the store.
pub fn connection_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
    vec![
        Arg::with_name("host")
            .help("Host name or IP address of the store")
            .long("host")
            .takes_value(true)
            .value_name("HOST")
            .env(HOST_ENV)
            .default_value(DEFAULT_HOST),
        Arg::with_name("port")
            .help("Port of the store")
            .long("port")
            .takes_value(true)
            .value_name("PORT")
            .env(PORT_ENV)
            .default_value(DEFAULT_PORT_STR),
        Arg::with_name("username")
            .help("User to authenticate as")
            .long("username")
            .takes_value(true)
            .value_name("USERNAME")
            .env(USERNAME_ENV),
        Arg::with_name("password")
            .help("Password to authenticate with; no AUTH is sent without one")
            .long("password")
            .takes_value(true)
            .value_name("PASSWORD")
            .env(PASSWORD_ENV)
            .hide_env_values(true),
        Arg::with_name("db")
            .help("Logical database to select")
            .long("db")
            .takes_value(true)
            .value_name("DB")
            .env(DB_ENV)
            .default_value("0"),
        Arg::with_name("raw")
            .help("Return values as raw bytes instead of decoding them as UTF-8")
            .long("raw"),
        Arg::with_name("verbose")
            .help("Log every command sent to the store")
            .short("v")
            .long("verbose"),
    ]
}

/// Build connection parameters from matches of `connection_args`.
pub fn params_from_matches(matches: &ArgMatches<'_>) -> Result<ConnectionParams> {
    let host = matches.value_of("host").unwrap_or(DEFAULT_HOST);
    let port = value_t!(matches, "port", u16)?;
    let db = value_t!(matches, "db", u32)?;

    let mut params = ConnectionParams::new(host, port)
        .with_db(db)
        .decode_responses(!matches.is_present("raw"));

    params = match (matches.value_of("username"), matches.value_of("password")) {
        (Some(username), Some(password)) => params.with_credentials(username, password),
        (None, Some(password)) => params.with_password(password),
        (_, None) => params,
    };

    params.validate()?;
    Ok(params)
}

/// Terminal logger on stderr. Debug level when `-v` was given, warnings otherwise.
pub fn logger(matches: &ArgMatches<'_>) -> Logger {
    let level = if matches.is_present("verbose") {
        Level::Debug
    } else {
        Level::Warning
    };

    let decorator = slog_term::PlainSyncDecorator::new(std::io::stderr());
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = drain.filter_level(level).fuse();

    Logger::root(drain, o!("version" => env!("CARGO_PKG_VERSION")))
}
