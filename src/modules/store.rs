use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use snafu::OptionExt;

use crate::errors::{CustomResult, RaceNotFoundSnafu};
use crate::models::NewRace;
use crate::modules::models::race::Race;

/// # where races are persisted
/// a store only loads and saves whole races; the race service makes sure a
/// race is never modified by two callers at once.
pub trait RaceStore: Send + Sync {
    /// create a race with a fresh id
    fn insert(&self, new_race: NewRace) -> CustomResult<Race>;
    fn load(&self, race_id: i32) -> CustomResult<Race>;
    fn exists(&self, race_id: i32) -> CustomResult<bool>;
    fn save(&self, race: &Race) -> CustomResult<()>;
    fn all(&self) -> CustomResult<Vec<Race>>;
}

#[derive(Debug, Default)]
pub struct MemoryRaceStore {
    races: Mutex<BTreeMap<i32, Race>>,
}

impl MemoryRaceStore {
    pub fn new() -> MemoryRaceStore {
        MemoryRaceStore::default()
    }
}

impl RaceStore for MemoryRaceStore {
    fn insert(&self, new_race: NewRace) -> CustomResult<Race> {
        let mut races = self.races.lock().unwrap_or_else(PoisonError::into_inner);
        let id = races.keys().next_back().map_or(1, |last| last + 1);

        let race = Race::new(id, new_race);
        races.insert(id, race.clone());

        Ok(race)
    }

    fn load(&self, race_id: i32) -> CustomResult<Race> {
        self.races
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&race_id)
            .cloned()
            .context(RaceNotFoundSnafu { race_id })
    }

    fn exists(&self, race_id: i32) -> CustomResult<bool> {
        Ok(self
            .races
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&race_id))
    }

    fn save(&self, race: &Race) -> CustomResult<()> {
        self.races
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(race.id, race.clone());
        Ok(())
    }

    fn all(&self) -> CustomResult<Vec<Race>> {
        Ok(self
            .races
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn new_race(name: &str) -> NewRace {
        NewRace { track_id: 1, name: name.to_string() }
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let store = MemoryRaceStore::new();

        let first = store.insert(new_race("first")).unwrap();
        let second = store.insert(new_race("second")).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(store.exists(2).unwrap());
        assert_eq!(store.all().unwrap().len(), 2);
    }

    #[test]
    fn save_replaces_the_stored_race() {
        let store = MemoryRaceStore::new();
        let mut race = store.insert(new_race("first")).unwrap();

        race.name = "renamed".to_string();
        store.save(&race).unwrap();

        assert_eq!(store.load(race.id).unwrap().name, "renamed");
    }

    #[test]
    fn load_of_unknown_race_fails() {
        let store = MemoryRaceStore::new();

        let error = store.load(12).unwrap_err();
        assert!(matches!(error, Error::RaceNotFound { race_id: 12 }));
        assert!(!store.exists(12).unwrap());
    }
}
