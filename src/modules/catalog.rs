use std::collections::HashMap;
use std::fs;

use log::info;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::errors::{CatalogFileSnafu, CustomResult, SerializationSnafu};
use crate::modules::models::car::Car;
use crate::modules::models::driver::Driver;
use crate::modules::models::track::Track;

/// # read access to the car, driver and track records
/// the race core never writes these records, it only looks them up.
pub trait Catalog: Send + Sync {
    fn car(&self, car_id: i32) -> Option<Car>;
    fn driver(&self, driver_number: i32) -> Option<Driver>;
    fn track(&self, track_id: i32) -> Option<Track>;
}

/// # the records of a catalog as stored in a json file
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CatalogData {
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub cars: Vec<Car>,
    #[serde(default)]
    pub drivers: Vec<Driver>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    cars: HashMap<i32, Car>,
    drivers: HashMap<i32, Driver>,
    tracks: HashMap<i32, Track>,
}

impl InMemoryCatalog {
    pub fn new() -> InMemoryCatalog {
        InMemoryCatalog::default()
    }

    pub fn from_data(data: CatalogData) -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        for track in data.tracks {
            catalog.insert_track(track);
        }
        for car in data.cars {
            catalog.insert_car(car);
        }
        for driver in data.drivers {
            catalog.insert_driver(driver);
        }

        catalog
    }

    /// # load a catalog from a json file
    ///
    /// ## Arguments
    /// * `path` - the path of a file holding `tracks`, `cars` and `drivers` arrays
    ///
    /// ## Returns
    /// * `InMemoryCatalog` - the catalog with all records in the file
    pub fn from_file(path: &str) -> CustomResult<InMemoryCatalog> {
        let contents = fs::read_to_string(path).context(CatalogFileSnafu { path })?;
        let data: CatalogData =
            serde_json::from_str(&contents).context(SerializationSnafu { what: path })?;

        info!(target: "catalog:from_file", "loaded {} tracks, {} cars and {} drivers from {}",
            data.tracks.len(), data.cars.len(), data.drivers.len(), path);

        Ok(InMemoryCatalog::from_data(data))
    }

    pub fn insert_car(&mut self, car: Car) {
        self.cars.insert(car.id, car);
    }

    pub fn insert_driver(&mut self, driver: Driver) {
        self.drivers.insert(driver.number, driver);
    }

    pub fn insert_track(&mut self, track: Track) {
        self.tracks.insert(track.id, track);
    }

    pub fn with_car(mut self, car: Car) -> InMemoryCatalog {
        self.insert_car(car);
        self
    }

    pub fn with_driver(mut self, driver: Driver) -> InMemoryCatalog {
        self.insert_driver(driver);
        self
    }

    pub fn with_track(mut self, track: Track) -> InMemoryCatalog {
        self.insert_track(track);
        self
    }
}

impl Catalog for InMemoryCatalog {
    fn car(&self, car_id: i32) -> Option<Car> {
        self.cars.get(&car_id).cloned()
    }

    fn driver(&self, driver_number: i32) -> Option<Driver> {
        self.drivers.get(&driver_number).cloned()
    }

    fn track(&self, track_id: i32) -> Option<Track> {
        self.tracks.get(&track_id).cloned()
    }
}
