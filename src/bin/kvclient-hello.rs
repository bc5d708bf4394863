extern crate clap;
#[macro_use]
extern crate slog;

use clap::{crate_version, App};
use kvclient::{config, StoreClient};

fn main() -> kvclient::Result<()> {
    if let Err(e) = run_hello() {
        // Print the Display message for any error.
        // Simply returning the error will print the Debug version, which is not as nice.
        eprintln!("{}", e);
        std::process::exit(1)
    }
    Ok(())
}

fn run_hello() -> kvclient::Result<()> {
    let matches = App::new(&[env!("CARGO_PKG_NAME"), "-hello"].concat())
        .version(crate_version!())
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("Set 'foo' to 'bar' in the store and read it back")
        .args(&config::connection_args())
        .get_matches();

    let log = config::logger(&matches);
    let params = config::params_from_matches(&matches)?;

    let mut client = StoreClient::connect_with_logger(&params, log.clone())?;

    let success = client.set("foo", "bar")?;
    debug!(log, "Set foo"; "success" => success);

    match client.get("foo")? {
        Some(value) => println!("{}", value),
        None => println!("None"),
    }

    Ok(())
}
