//! Command-line client for a CAS broker: sends single protocol requests over one
//! connection and reports what the server answered.

#![warn(rust_2018_idioms)]

use std::error::Error;

use clap::{App, Arg, ArgMatches, SubCommand};
use log::{error, info};
use tokio::net::TcpStream;

use cas_common::config::config::ClientConfig;
use cas_protocol::protocol::database::cas::packet::{
    CASPacket, CASPacketKind, CasInfo, CloseDatabasePacket, GetEngineVersionPacket,
};
use cas_protocol::service::cas::CASService;

fn parse_token(matches: &ArgMatches<'_>) -> Result<CasInfo, Box<dyn Error>> {
    let token = matches.value_of("token").unwrap_or_default();
    let bytes = hex::decode(token)?;
    Ok(CasInfo::from_slice(&bytes)?)
}

fn init_logger(config: &ClientConfig, verbosity: u64) {
    let level = match verbosity {
        0 => config.app().log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let token_arg = Arg::with_name("token")
        .short("t")
        .long("token")
        .takes_value(true)
        .required(true)
        .help("cas info of the session, 8 hex digits");

    let matches = App::new("CAS Client")
        .version("0.1.0")
        .author("AlphaPo")
        .about("Speaks the CAS wire protocol to a database broker")
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .help("verbosity level"))
        .args_from_usage("-c, --config=[FILE] 'Client configuration file'")
        .subcommand(SubCommand::with_name("close")
            .about("closes the database session")
            .arg(token_arg.clone()))
        .subcommand(SubCommand::with_name("version")
            .about("asks the engine version")
            .arg(token_arg)
            .arg_from_usage("--no-autocommit 'request with auto commit off'"))
        .get_matches();

    let config_path = matches.value_of("config").unwrap_or("./etc/app.toml");
    let client_config = ClientConfig::from_file(config_path)?;
    init_logger(&client_config, matches.occurrences_of("verbose"));
    info!("config_path : {}", config_path);
    client_config.make_current();

    let mut packet = match matches.subcommand() {
        ("close", Some(sub)) => CASPacketKind::from(CloseDatabasePacket::new(parse_token(sub)?)),
        ("version", Some(sub)) => {
            CASPacketKind::from(GetEngineVersionPacket::new(parse_token(sub)?, !sub.is_present("no-autocommit")))
        }
        _ => {
            error!("no request given, see --help");
            return Ok(());
        }
    };

    let broker_addr = ClientConfig::get_broker_addr();
    info!("connecting to {}", broker_addr);
    let mut socket = TcpStream::connect(&broker_addr).await?;
    let mut service = CASService::new(&mut socket);
    service.request(&mut packet).await?;

    let status = packet.response_status();
    if status.is_failure() {
        error!("{:?} failed: [{}] {}", packet.get_function_code(), status.get_error_code(), status.get_error_message());
        return Ok(());
    }
    match &packet {
        CASPacketKind::GetEngineVersion(version) => info!("engine version {}", version.get_engine_version()),
        _ => info!("{:?} done for {:?}", packet.get_function_code(), packet.get_cas_info()),
    }
    Ok(())
}
