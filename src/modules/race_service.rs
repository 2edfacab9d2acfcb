use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use log::info;
use rand::Rng;
use snafu::{ensure, OptionExt};

use crate::errors::{
    CarHasNoDriverSnafu, CarNotFoundSnafu, CustomResult, RaceNotFoundSnafu, TrackNotFoundSnafu,
};
use crate::models::{NewEntrant, NewLapTime, NewRace};
use crate::modules::catalog::Catalog;
use crate::modules::leaderboard::Leaderboard;
use crate::modules::models::entrant::Entrant;
use crate::modules::models::grid::{QualifyingStrategy, StartingGrid};
use crate::modules::models::lap::Lap;
use crate::modules::models::race::Race;
use crate::modules::models::track::{Track, TrackType};
use crate::modules::simulator::{LapConditions, LapResult, LapSimulator};
use crate::modules::store::RaceStore;

/// # the operations on races
/// every change to a race runs under that race's lock: the race is loaded,
/// changed and saved before the next change to the same race starts. Changes
/// to different races don't wait on each other.
pub struct RaceService<S: RaceStore, C: Catalog> {
    store: S,
    catalog: C,
    car_uri_base: String,
    race_locks: Mutex<HashMap<i32, Arc<Mutex<()>>>>,
}

impl<S: RaceStore, C: Catalog> RaceService<S, C> {
    pub fn new(store: S, catalog: C, car_uri_base: &str) -> RaceService<S, C> {
        RaceService {
            store,
            catalog,
            car_uri_base: car_uri_base.to_string(),
            race_locks: Mutex::new(HashMap::new()),
        }
    }

    /********** RACES **********/
    /// # create a race on a track
    ///
    /// ## Arguments
    /// * `new_race` - the track and name of the race
    ///
    /// ## Returns
    /// * `Race` - the new race without entrants
    pub fn create_race(&self, new_race: NewRace) -> CustomResult<Race> {
        let track_id = new_race.track_id;
        self.catalog.track(track_id).context(TrackNotFoundSnafu { track_id })?;

        let race = self.store.insert(new_race)?;
        info!(target: "race_service:create_race", "created race {} '{}' on track {}", race.id, race.name, track_id);

        Ok(race)
    }

    pub fn get_race(&self, race_id: i32) -> CustomResult<Race> {
        self.store.load(race_id)
    }

    pub fn list_races(&self) -> CustomResult<Vec<Race>> {
        self.store.all()
    }

    /// # the races held on a track
    ///
    /// ## Arguments
    /// * `track_id` - the track, must exist in the catalog
    ///
    /// ## Returns
    /// * `Vec<Race>` - the races on the track, ordered by id
    pub fn list_races_for_track(&self, track_id: i32) -> CustomResult<Vec<Race>> {
        self.catalog.track(track_id).context(TrackNotFoundSnafu { track_id })?;

        Ok(self
            .store
            .all()?
            .into_iter()
            .filter(|race| race.track_id == track_id)
            .collect())
    }

    /********** ENTRANTS **********/
    pub fn add_entrant(&self, race_id: i32, new_entrant: NewEntrant) -> CustomResult<Entrant> {
        self.modify(race_id, |race| race.add_entrant(&self.catalog, new_entrant, &self.car_uri_base))
    }

    pub fn remove_entrant(&self, race_id: i32, car_id: i32) -> CustomResult<Entrant> {
        self.modify(race_id, |race| race.remove_entrant(car_id))
    }

    /// the car uris of the entrants in slot order
    pub fn list_entrant_car_refs(&self, race_id: i32) -> CustomResult<Vec<String>> {
        Ok(self.store.load(race_id)?.entrant_car_uris())
    }

    /********** QUALIFYING **********/
    pub fn qualify(
        &self,
        race_id: i32,
        strategy: QualifyingStrategy,
        rng: &mut impl Rng,
    ) -> CustomResult<StartingGrid> {
        self.modify(race_id, |race| race.qualify(&self.catalog, strategy, rng))
    }

    pub fn qualify_random(&self, race_id: i32, rng: &mut impl Rng) -> CustomResult<StartingGrid> {
        self.modify(race_id, |race| race.qualify_random(rng))
    }

    pub fn qualify_by_skill(&self, race_id: i32, track_type: TrackType) -> CustomResult<StartingGrid> {
        self.modify(race_id, |race| race.qualify_by_skill(&self.catalog, track_type))
    }

    /********** LAPS **********/
    /// # record a lap with the given results
    ///
    /// ## Arguments
    /// * `race_id` - the race
    /// * `lap_times` - one result per entrant in slot order
    ///
    /// ## Returns
    /// * `Lap` - the recorded lap
    pub fn add_lap(&self, race_id: i32, lap_times: &[NewLapTime]) -> CustomResult<Lap> {
        self.modify(race_id, |race| {
            let track = self.track_of(race)?;
            race.add_lap(&track, lap_times)
        })
    }

    pub fn list_laps(&self, race_id: i32) -> CustomResult<Vec<Lap>> {
        Ok(self.store.load(race_id)?.laps)
    }

    pub fn get_lap(&self, race_id: i32, lap_number: u32) -> CustomResult<Lap> {
        self.store.load(race_id)?.lap(lap_number).cloned()
    }

    /// # the leaderboard of a race
    /// computed from the recorded laps on every call
    pub fn get_leaderboard(&self, race_id: i32, up_to_lap: Option<usize>) -> CustomResult<Leaderboard> {
        Leaderboard::of_race(&self.store.load(race_id)?, up_to_lap)
    }

    /********** SIMULATION **********/
    pub fn simulate_lap_time(
        &self,
        rng: &mut impl Rng,
        reliability: u32,
        suitability: u32,
        base_lap_time: f64,
        track_type: &str,
    ) -> CustomResult<LapResult> {
        LapSimulator::simulate_raw(rng, reliability, suitability, base_lap_time, track_type)
    }

    /// # simulate a lap for a car from the catalog
    /// the car must have a driver; its suitability for the track type is used
    ///
    /// ## Arguments
    /// * `rng` - the random source
    /// * `car_id` - the car
    /// * `base_lap_time` - the base lap time of the track in seconds
    /// * `track_type` - `race` or `street`
    ///
    /// ## Returns
    /// * `LapResult` - the simulated lap
    pub fn simulate_car_lap(
        &self,
        rng: &mut impl Rng,
        car_id: i32,
        base_lap_time: f64,
        track_type: &str,
    ) -> CustomResult<LapResult> {
        let track_type: TrackType = track_type.parse()?;

        let car = self.catalog.car(car_id).context(CarNotFoundSnafu { car_id })?;
        ensure!(car.driver_number.is_some(), CarHasNoDriverSnafu { car_id });

        Ok(LapSimulator::simulate(rng, &LapConditions::for_car(&car, base_lap_time, track_type)))
    }

    /// # simulate the next lap of a race and record it
    /// one lap is simulated per entrant in slot order, then the lap is added
    /// like any other lap.
    pub fn simulate_lap(&self, race_id: i32, rng: &mut impl Rng) -> CustomResult<Lap> {
        self.modify(race_id, |race| {
            let track = self.track_of(race)?;

            let lap_times = race
                .entrants
                .iter()
                .map(|entrant| {
                    let car_id = entrant.car_id;
                    let car = self.catalog.car(car_id).context(CarNotFoundSnafu { car_id })?;
                    let conditions = LapConditions::for_car(&car, track.base_lap_time, track.track_type);

                    Ok(LapSimulator::simulate(&mut *rng, &conditions).to_new_lap_time())
                })
                .collect::<CustomResult<Vec<NewLapTime>>>()?;

            race.add_lap(&track, &lap_times)
        })
    }

    /********** HELPERS **********/
    fn track_of(&self, race: &Race) -> CustomResult<Track> {
        let track_id = race.track_id;
        self.catalog.track(track_id).context(TrackNotFoundSnafu { track_id })
    }

    fn race_lock(&self, race_id: i32) -> Arc<Mutex<()>> {
        self.race_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(race_id)
            .or_default()
            .clone()
    }

    /// load, change and save a race while holding its lock. A failed change
    /// is not saved. Races are never deleted, so only races that exist get a
    /// lock.
    fn modify<T>(&self, race_id: i32, change: impl FnOnce(&mut Race) -> CustomResult<T>) -> CustomResult<T> {
        ensure!(self.store.exists(race_id)?, RaceNotFoundSnafu { race_id });

        let lock = self.race_lock(race_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut race = self.store.load(race_id)?;
        let result = change(&mut race)?;
        self.store.save(&race)?;

        Ok(result)
    }
}
