//! Parcel tracker demo entry point.
//!
//! # Responsibility
//! - Wire configuration, logging and storage into `ParcelService`.
//! - Replay the register / correct / ship / delete scenario for one client.

mod config;

use config::CliConfig;
use log::error;
use parcel_core::db::open_db;
use parcel_core::{
    core_version, init_logging, ClientId, ParcelService, ParcelRepository, RepoError,
    SqliteParcelStore,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match CliConfig::from_env(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CliConfig) -> Result<(), RepoError> {
    println!("parcel_core version={}", core_version());

    let conn = open_db(&config.db_path)?;
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn)?);
    let client = config.client;

    let parcel = service.register(client, "12 Harbour Road, Pskov")?;
    println!("registered {parcel}");

    service.change_address(parcel.number, "7 Station Square, Saratov")?;
    println!("address of parcel {} changed", parcel.number);

    let status = service.next_status(parcel.number)?;
    println!("parcel {} is now {status}", parcel.number);

    print_client_parcels(&service, client)?;

    match service.delete(parcel.number) {
        Err(RepoError::PreconditionFailed { number, status }) => {
            println!("parcel {number} kept: deletion refused while {status}");
        }
        other => other?,
    }

    let extra = service.register(client, "7 Station Square, Saratov")?;
    service.delete(extra.number)?;
    println!("parcel {} registered and deleted", extra.number);

    print_client_parcels(&service, client)
}

fn print_client_parcels<R: ParcelRepository>(
    service: &ParcelService<R>,
    client: ClientId,
) -> Result<(), RepoError> {
    let parcels = service.parcels_of(client)?;
    println!("client {client} has {} parcel(s)", parcels.len());
    for parcel in &parcels {
        println!("  {parcel}");
    }
    Ok(())
}
