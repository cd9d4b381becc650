//! Program configurations.

use std::env;

use clap::{Arg, ArgMatches, Command};
use serde::Deserialize;

/// Configuration file object.
#[derive(Default, Deserialize)]
pub struct Config {
    /// HTTP listen port.
    pub port: Option<u16>,
    /// Root path of the APIs such as `lk30-codec`.
    pub scope: Option<String>,
}

pub const DEF_PORT: u16 = 1080;
pub const DEF_SCOPE: &'static str = "lk30-codec";

/// To register Clap arguments.
pub fn reg_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("lk30-codec.port")
            .long("lk30-codec.port")
            .help("HTTP listen port. Default 1080")
            .num_args(1)
            .value_parser(1..=65535),
    )
    .arg(
        Arg::new("lk30-codec.scope")
            .long("lk30-codec.scope")
            .help("API scope root path. Default `lk30-codec`")
            .num_args(1),
    )
}

/// To read input arguments from command-line arguments and environment variables.
///
/// This function will call [`apply_default()`] to fill missing values so you do not need call it
/// again.
pub fn read_args(args: &ArgMatches) -> Config {
    apply_default(&Config {
        port: match args.get_one::<i64>("lk30-codec.port") {
            None => match env::var("LK30_CODEC_PORT") {
                Err(_) => Some(DEF_PORT),
                Ok(v) => match v.parse::<u16>() {
                    Err(_) => Some(DEF_PORT),
                    Ok(v) => Some(v),
                },
            },
            Some(v) => Some(*v as u16),
        },
        scope: match args.get_one::<String>("lk30-codec.scope") {
            None => match env::var("LK30_CODEC_SCOPE") {
                Err(_) => None,
                Ok(v) => Some(v),
            },
            Some(v) => Some(v.clone()),
        },
    })
}

/// Fill missing configuration with default values.
pub fn apply_default(config: &Config) -> Config {
    Config {
        port: match config.port.as_ref() {
            None => Some(DEF_PORT),
            Some(port) => Some(*port),
        },
        scope: match config.scope.as_ref() {
            None => Some(DEF_SCOPE.to_string()),
            Some(scope) => Some(scope.trim_matches('/').to_string()),
        },
    }
}
