#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

use crate::config::{AssetsFairing, ConfigFairing, DatabaseFairing};
use crate::logging::LoggerFairing;
use crate::model::store::Roster;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;

/// Build the server, connecting to the store described by the configuration
/// when it is ignited.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .register("/", error::catchers())
        .attach(ConfigFairing)
        .attach(DatabaseFairing)
        .attach(AssetsFairing)
        .attach(LoggerFairing)
}

/// Build the server around an existing roster, without contacting any database.
pub fn rocket_for_roster(roster: Roster) -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .register("/", error::catchers())
        .manage(roster)
        .attach(LoggerFairing)
}
