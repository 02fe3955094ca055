use std::path::{Path, PathBuf};

use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    fs::FileServer,
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::{activity::reset_to_seed, mongodb::MongoActivityStore, store::Roster};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    database: String,
    #[serde(default = "default_seed_on_launch")]
    seed_on_launch: bool,
    #[serde(default = "default_static_dir")]
    static_dir: PathBuf,
}

fn default_database() -> String {
    "mergington_school".to_string()
}

fn default_seed_on_launch() -> bool {
    true
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Config {
    /// Name of the MongoDB database holding the `activities` collection.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Whether to wipe the roster and reload the seed activities at launch.
    pub fn seed_on_launch(&self) -> bool {
        self.seed_on_launch
    }

    /// Directory of front-end files served under `/static`.
    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }
}

/// Load the config from the figment, or log why it could not be loaded.
fn load<T: for<'de> Deserialize<'de>>(rocket: &Rocket<Build>, what: &str) -> Option<T> {
    match rocket.figment().extract::<T>() {
        Ok(config) => Some(config),
        Err(e) => {
            error!("Failed to load {what} config");
            rocket::config::pretty_print_error(e);
            None
        }
    }
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        match load::<Config>(&rocket, "application") {
            Some(config) => Ok(rocket.manage(config)),
            None => Err(rocket),
        }
    }
}

/// Configuration for the database.
#[derive(Deserialize)]
struct DbConfig {
    // secrets
    db_uri: String,
}

/// A fairing that connects to MongoDB, optionally resets the roster to the
/// seed activities, and places a [`Roster`] into managed state.
///
/// Must be attached after [`ConfigFairing`].
pub struct DatabaseFairing;

#[rocket::async_trait]
impl Fairing for DatabaseFairing {
    fn info(&self) -> Info {
        Info {
            name: "MongoDB",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let Some(config) = rocket.state::<Config>().cloned() else {
            error!("Application config is not loaded; attach ConfigFairing first");
            return Err(rocket);
        };
        let Some(db_config) = load::<DbConfig>(&rocket, "database") else {
            return Err(rocket);
        };
        info!("Loaded database config, connecting...");

        // Construct the connection.
        let client = match MongoClient::with_uri_str(db_config.db_uri).await {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to connect to database: {e}");
                return Err(rocket);
            }
        };
        let db = client.database(config.database());
        let store = MongoActivityStore::new(&db);

        if config.seed_on_launch() {
            if let Err(e) = reset_to_seed(&store).await {
                error!("Failed to seed activities: {e}");
                return Err(rocket);
            }
        } else {
            info!("Keeping existing activities in database {}", config.database());
        }
        info!("...database connection online!");

        Ok(rocket.manage(Roster::new(store)))
    }
}

/// A fairing that serves the front-end files under `/static`, if they exist.
///
/// Must be attached after [`ConfigFairing`].
pub struct AssetsFairing;

#[rocket::async_trait]
impl Fairing for AssetsFairing {
    fn info(&self) -> Info {
        Info {
            name: "Static assets",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let Some(dir) = rocket.state::<Config>().map(|c| c.static_dir().to_path_buf()) else {
            error!("Application config is not loaded; attach ConfigFairing first");
            return Err(rocket);
        };
        if !dir.is_dir() {
            warn!(
                "Static directory {} not found, front-end will not be served",
                dir.display()
            );
            return Ok(rocket);
        }
        info!("Serving front-end from {}", dir.display());
        Ok(rocket.mount("/static", FileServer::from(dir)))
    }
}

#[cfg(test)]
mod tests {
    use rocket::figment::{providers::Serialized, Figment};

    use super::*;

    #[test]
    fn defaults() {
        let config = Figment::new().extract::<Config>().unwrap();
        assert_eq!(config.database(), "mergington_school");
        assert!(config.seed_on_launch());
        assert_eq!(config.static_dir(), Path::new("static"));
    }

    #[test]
    fn overrides() {
        let config = Figment::new()
            .merge(Serialized::default("database", "elsewhere"))
            .merge(Serialized::default("seed_on_launch", false))
            .merge(Serialized::default("static_dir", "/srv/www"))
            .extract::<Config>()
            .unwrap();
        assert_eq!(config.database(), "elsewhere");
        assert!(!config.seed_on_launch());
        assert_eq!(config.static_dir(), Path::new("/srv/www"));
    }

    #[rocket::async_test]
    async fn missing_static_dir_is_skipped() {
        let figment = rocket::Config::figment().merge(("static_dir", "no/such/dir"));
        let rocket = rocket::custom(figment)
            .attach(ConfigFairing)
            .attach(AssetsFairing)
            .ignite()
            .await
            .unwrap();
        assert!(rocket.routes().all(|r| !r.uri.to_string().starts_with("/static")));
    }
}
