use std::{error::Error as StdError, fs, net::SocketAddr, time::Duration};

use clap::{Arg as ClapArg, Command};
use log::{self, error, info};
use serde::Deserialize;
use sylvia_iot_sdk::util::logger;

use lk30_codec::{libs, routes};

#[derive(Deserialize)]
struct AppConfig {
    log: logger::Config,
    #[serde(rename = "lk30Codec")]
    lk30_codec: libs::config::Config,
}

const PROJ_NAME: &'static str = env!("CARGO_PKG_NAME");
const PROJ_VER: &'static str = env!("CARGO_PKG_VERSION");
const REQ_TIMEOUT_SECS: u64 = 10;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    const FN_NAME: &'static str = "main";

    let conf = match init_config() {
        Err(e) => {
            let conf = &logger::Config {
                ..Default::default()
            };
            logger::init(PROJ_NAME, &conf);
            error!("[{}] read config error: {}", FN_NAME, e);
            return Ok(());
        }
        Ok(conf) => conf,
    };

    logger::init(PROJ_NAME, &conf.log);

    let conf = libs::config::apply_default(&conf.lk30_codec);
    let state = routes::new_state(&conf);
    let app = routes::new_app(&state, Duration::from_secs(REQ_TIMEOUT_SECS));

    let addr = SocketAddr::from(([0, 0, 0, 0], conf.port.unwrap_or(libs::config::DEF_PORT)));
    info!("[{}] listen on {}{}", FN_NAME, addr, state.scope_path);
    if let Err(e) = axum_server::bind(addr).serve(app.into_make_service()).await {
        error!("[{}] server error: {}", FN_NAME, e);
        return Err(e);
    }
    Ok(())
}

fn init_config() -> Result<AppConfig, Box<dyn StdError>> {
    let mut args = Command::new(PROJ_NAME).version(PROJ_VER).arg(
        ClapArg::new("file")
            .short('f')
            .long("file")
            .help("config file")
            .num_args(1),
    );
    args = logger::reg_args(args);
    args = libs::config::reg_args(args);
    let args = args.get_matches();

    if let Some(v) = args.get_one::<String>("file") {
        let conf_str = fs::read_to_string(v)?;
        return Ok(json5::from_str(conf_str.as_str())?);
    }

    Ok(AppConfig {
        log: logger::read_args(&args),
        lk30_codec: libs::config::read_args(&args),
    })
}
