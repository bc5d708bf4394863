//! Client networking

mod client;
mod data;
pub mod resp;

pub use self::client::StoreClient;
pub use self::data::Value;
