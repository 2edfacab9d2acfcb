use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::NewRace;
use crate::modules::models::entrant::Entrant;
use crate::modules::models::grid::StartingGrid;
use crate::modules::models::lap::Lap;

/// # a single race on a track
/// owns the entrants, the starting grid once qualifying ran, and the
/// recorded laps. Entrants are only appended (or removed) before qualifying,
/// laps are only appended after.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub id: i32,
    pub track_id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub entrants: Vec<Entrant>,
    #[serde(default)]
    pub starting_grid: Option<StartingGrid>,
    #[serde(default)]
    pub laps: Vec<Lap>,
}

impl Race {
    /// # create race
    /// create a race without entrants, grid or laps
    ///
    /// ## Arguments
    /// * `id` - the id the store assigned to the race
    /// * `new_race` - the track and name of the race
    ///
    /// ## Returns
    /// * `Race` - the created race
    pub fn new(id: i32, new_race: NewRace) -> Race {
        Race {
            id,
            track_id: new_race.track_id,
            name: new_race.name,
            created_at: chrono::Local::now().naive_local(),
            entrants: Vec::new(),
            starting_grid: None,
            laps: Vec::new(),
        }
    }

    /// # check if qualifying took place
    /// a non-empty starting grid locks the entrant list
    pub fn is_qualified(&self) -> bool {
        self.starting_grid
            .as_ref()
            .map_or(false, |grid| !grid.positions.is_empty())
    }

    pub fn lap_count(&self) -> usize {
        self.laps.len()
    }
}
