//! The `kvclient` crate is a small blocking client for a hosted key-value store
//! that speaks RESP2: connect with credentials, then set and get string values.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications
)]
#![warn(clippy::module_name_repetitions, missing_docs)]

#[macro_use]
extern crate slog;

pub mod config;
mod errors;
mod network;
mod params;

pub use self::errors::{Result, StoreError};
pub use self::network::resp;
pub use self::network::{StoreClient, Value};
pub use self::params::{ConnectionParams, DEFAULT_HOST, DEFAULT_PORT};
