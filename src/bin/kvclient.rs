extern crate clap;

use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use failure;
use kvclient::{config, StoreClient};

fn main() -> kvclient::Result<()> {
    if let Err(e) = run_client() {
        // Print the Display message for any error.
        // Simply returning the error will print the Debug version, which is not as nice.
        eprintln!("{}", e);
        std::process::exit(1)
    }
    Ok(())
}

fn run_client() -> kvclient::Result<()> {
    let connection_args = config::connection_args();
    let key_arg = Arg::with_name("key")
        .takes_value(true)
        .value_name("KEY")
        .required(true);

    let matches = App::new(env!("CARGO_PKG_NAME"))
        .version(crate_version!())
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .settings(&[
            AppSettings::VersionlessSubcommands,
            AppSettings::SubcommandRequiredElseHelp,
        ])
        .subcommand(
            SubCommand::with_name("get")
                .about("Get the string value of a given string key")
                .arg(&key_arg)
                .args(&connection_args),
        )
        .subcommand(
            SubCommand::with_name("set")
                .about("Set the value of a string key to a string")
                .arg(&key_arg)
                .arg(
                    Arg::with_name("value")
                        .takes_value(true)
                        .value_name("VALUE")
                        .required(true),
                )
                .args(&connection_args),
        )
        .subcommand(
            SubCommand::with_name("rm")
                .about("Remove a given key")
                .arg(&key_arg)
                .args(&connection_args),
        )
        .get_matches();

    match matches.subcommand() {
        ("get", Some(command_matches)) => match command_matches.value_of("key") {
            Some(key) => {
                let mut client = connect(command_matches)?;
                match client.get(key)? {
                    None => println!("Key not found"),
                    Some(value) => println!("{}", value),
                }
                Ok(())
            }
            _ => Err(KvClientCliError::UnexpectedArgs.into()),
        },
        ("set", Some(command_matches)) => match (
            command_matches.value_of("key"),
            command_matches.value_of("value"),
        ) {
            (Some(key), Some(value)) => {
                let mut client = connect(command_matches)?;
                if client.set(key, value)? {
                    Ok(())
                } else {
                    Err(KvClientCliError::NotStored.into())
                }
            }
            _ => Err(KvClientCliError::UnexpectedArgs.into()),
        },
        ("rm", Some(command_matches)) => match command_matches.value_of("key") {
            Some(key) => {
                let mut client = connect(command_matches)?;
                if client.delete(key)? {
                    Ok(())
                } else {
                    Err(KvClientCliError::KeyNotFound.into())
                }
            }
            _ => Err(KvClientCliError::UnexpectedArgs.into()),
        },
        (cmd, _) => Err(KvClientCliError::UnknownCommand {
            command: cmd.to_string(),
        }
        .into()),
    }
}

fn connect(matches: &ArgMatches<'_>) -> kvclient::Result<StoreClient> {
    let log = config::logger(matches);
    let params = config::params_from_matches(matches)?;
    StoreClient::connect_with_logger(&params, log)
}

#[derive(Debug, failure::Fail)]
enum KvClientCliError {
    #[fail(display = "Unknown command: {}", command)]
    UnknownCommand { command: String },

    #[fail(display = "Unexpected CLI arguments")]
    UnexpectedArgs,

    #[fail(display = "Key not found")]
    KeyNotFound,

    #[fail(display = "Value was not stored")]
    NotStored,
}
