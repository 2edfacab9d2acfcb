use std::env;

use dotenvy::dotenv;

pub const DEFAULT_LOG_FILE: &str = "race_director.log";
pub const DEFAULT_CAR_URI_BASE: &str = "https://TeamVM/car";
pub const DEFAULT_RACE_WEEKEND_FILE: &str = "./race_weekend.json";

/// # settings read from the environment
/// a `.env` file in the working directory is loaded first
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub logging_level: String,
    pub log_file: String,
    /// when set races are stored in redis, otherwise in memory
    pub redis_url: Option<String>,
    pub car_uri_base: String,
    pub race_weekend_file: String,
    pub race_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            logging_level: "INFO".to_string(),
            log_file: DEFAULT_LOG_FILE.to_string(),
            redis_url: None,
            car_uri_base: DEFAULT_CAR_URI_BASE.to_string(),
            race_weekend_file: DEFAULT_RACE_WEEKEND_FILE.to_string(),
            race_seed: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Settings {
        dotenv().ok();
        Settings::from_lookup(|key| env::var(key).ok())
    }

    /// # build the settings from a key lookup
    /// missing or empty values fall back to the defaults, a seed that is not a
    /// number is ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Settings {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Settings::default();

        Settings {
            logging_level: get("LOGGING_LEVEL")
                .map(|level| level.to_uppercase())
                .unwrap_or(defaults.logging_level),
            log_file: get("LOG_FILE").unwrap_or(defaults.log_file),
            redis_url: get("REDIS_URL"),
            car_uri_base: get("CAR_URI_BASE").unwrap_or(defaults.car_uri_base),
            race_weekend_file: get("RACE_WEEKEND_FILE").unwrap_or(defaults.race_weekend_file),
            race_seed: get("RACE_SEED").and_then(|seed| seed.trim().parse().ok()),
        }
    }
}
