use std::fs;
use std::process;

use log::{error, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use snafu::ResultExt;

use race_director::errors::{CatalogFileSnafu, CustomResult, Error, SerializationSnafu};
use race_director::models::{NewEntrant, NewRace};
use race_director::modules::catalog::{CatalogData, InMemoryCatalog};
use race_director::modules::helpers::config::Settings;
use race_director::modules::helpers::logging::setup_logging;
use race_director::modules::leaderboard::Leaderboard;
use race_director::modules::models::grid::QualifyingStrategy;
use race_director::modules::race_service::RaceService;
use race_director::modules::redis::RedisRaceStore;
use race_director::modules::store::{MemoryRaceStore, RaceStore};

/// the race to run and the records it needs
#[derive(Deserialize, Debug)]
struct RaceWeekend {
    #[serde(flatten)]
    catalog: CatalogData,
    race: RaceEntryList,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RaceEntryList {
    name: String,
    track_id: i32,
    entrants: Vec<NewEntrant>,
    qualifying: QualifyingStrategy,
}

fn load_weekend(path: &str) -> CustomResult<RaceWeekend> {
    let data = fs::read_to_string(path).context(CatalogFileSnafu { path })?;
    serde_json::from_str(&data).context(SerializationSnafu { what: path })
}

fn print_leaderboard(leaderboard: &Leaderboard) {
    println!("lap {}", leaderboard.lap);
    for entry in &leaderboard.entrants {
        let driver = entry.driver_number.map_or("-".to_string(), |number| number.to_string());
        println!("  {:>2}. car {:<4} driver {:<4} laps {:<3} {}", entry.position, entry.car_id, driver, entry.laps, entry.time);
    }
}

fn run_race<S: RaceStore>(
    service: &RaceService<S, InMemoryCatalog>,
    entry_list: RaceEntryList,
    rng: &mut ChaCha8Rng,
) -> CustomResult<()> {
    let race = service.create_race(NewRace {
        track_id: entry_list.track_id,
        name: entry_list.name,
    })?;

    for new_entrant in entry_list.entrants {
        match service.add_entrant(race.id, new_entrant) {
            Ok(entrant) => {
                info!(target: "simulate_race", "entered car {} ({})", entrant.car_id, entrant.uri);
            }
            Err(error) => {
                warn!(target: "simulate_race", "car {} not entered: {}", new_entrant.car_id, error);
            }
        }
    }

    let grid = service.qualify(race.id, entry_list.qualifying, rng)?;
    println!("{} starting grid (slots): {:?}", race.name, grid.slots());

    loop {
        match service.simulate_lap(race.id, rng) {
            Ok(lap) => {
                let leaderboard = service.get_leaderboard(race.id, Some(lap.number as usize))?;
                print_leaderboard(&leaderboard);
            }
            Err(Error::LapLimitExceeded { total_laps, .. }) => {
                info!(target: "simulate_race", "race {} finished after {} laps", race.id, total_laps);
                break;
            }
            Err(error) => return Err(error),
        }
    }

    Ok(())
}

fn main() {
    let settings = Settings::from_env();
    if let Err(error) = setup_logging(&settings) {
        eprintln!("failed to setup logging: {}", error);
        process::exit(1);
    }

    let weekend = match load_weekend(&settings.race_weekend_file) {
        Ok(weekend) => weekend,
        Err(error) => {
            error!(target: "simulate_race", "could not load race weekend: {}", error);
            eprintln!("{}", error);
            process::exit(1);
        }
    };

    let mut rng = match settings.race_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let catalog = InMemoryCatalog::from_data(weekend.catalog);

    let result = match &settings.redis_url {
        Some(redis_url) => RedisRaceStore::open(redis_url).and_then(|store| {
            run_race(&RaceService::new(store, catalog, &settings.car_uri_base), weekend.race, &mut rng)
        }),
        None => run_race(
            &RaceService::new(MemoryRaceStore::new(), catalog, &settings.car_uri_base),
            weekend.race,
            &mut rng,
        ),
    };

    if let Err(error) = result {
        error!(target: "simulate_race", "race simulation failed: {}", error);
        eprintln!("{}", error);
        process::exit(1);
    }
}
