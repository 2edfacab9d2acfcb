use std::fmt;

use serde::{Serialize, Serializer};
use snafu::ensure;

use crate::errors::{CustomResult, InvalidLapNumberSnafu};
use crate::modules::models::entrant::Entrant;
use crate::modules::models::lap::Lap;
use crate::modules::models::race::Race;

/// seconds added to the cumulative time per slot behind the first
pub const GRID_HANDICAP_SECONDS: f64 = 5.0;

/// # the cumulative time of an entrant
/// a crashed entrant has no finite time
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum RaceTime {
    Elapsed(f64),
    Crashed,
}

impl RaceTime {
    /// # the time in seconds
    /// a crash is infinitely slow
    pub fn as_secs(&self) -> f64 {
        match self {
            RaceTime::Elapsed(seconds) => *seconds,
            RaceTime::Crashed => f64::INFINITY,
        }
    }

    pub fn is_crashed(&self) -> bool {
        matches!(self, RaceTime::Crashed)
    }
}

impl fmt::Display for RaceTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RaceTime::Elapsed(seconds) => write!(f, "{:.3}", seconds),
            RaceTime::Crashed => write!(f, "Crashed"),
        }
    }
}

impl Serialize for RaceTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RaceTime::Elapsed(seconds) => serializer.serialize_f64(*seconds),
            RaceTime::Crashed => serializer.serialize_str("Crashed"),
        }
    }
}

/// # the standing of a single entrant
/// `position` is the slot plus one. The board is kept in slot order and is
/// not ranked by time.
#[derive(Serialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub position: usize,
    pub slot: usize,
    #[serde(rename = "number")]
    pub car_id: i32,
    pub uri: String,
    pub driver_number: Option<i32>,
    pub laps: u32,
    pub time: RaceTime,
    pub crashed: bool,
}

#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct Leaderboard {
    /// the recorded lap count, or the lap the board was requested for
    pub lap: usize,
    pub entrants: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// # get the leaderboard of a race
    ///
    /// ## Arguments
    /// * `race` - the race
    /// * `up_to_lap` - only count the first n laps, `None` counts all laps
    ///
    /// ## Returns
    /// * `Leaderboard` - the standings
    pub fn of_race(race: &Race, up_to_lap: Option<usize>) -> CustomResult<Leaderboard> {
        if let Some(lap_number) = up_to_lap {
            ensure!(lap_number >= 1, InvalidLapNumberSnafu);
        }

        Ok(Leaderboard {
            lap: up_to_lap.unwrap_or(race.lap_count()),
            entrants: compute_leaderboard(&race.entrants, &race.laps, up_to_lap),
        })
    }
}

/// # compute the standings from the recorded laps
/// every entrant starts with a handicap of `slot * 5` seconds. Once an
/// entrant crashed it accrues no more time and stays crashed.
///
/// ## Arguments
/// * `entrants` - the entrants in slot order
/// * `laps` - the recorded laps in order
/// * `up_to_lap` - only count the first n laps
///
/// ## Returns
/// * `Vec<LeaderboardEntry>` - one entry per entrant in slot order
pub fn compute_leaderboard(
    entrants: &[Entrant],
    laps: &[Lap],
    up_to_lap: Option<usize>,
) -> Vec<LeaderboardEntry> {
    let laps = match up_to_lap {
        Some(count) => &laps[..count.min(laps.len())],
        None => laps,
    };

    entrants
        .iter()
        .enumerate()
        .map(|(slot, entrant)| {
            let mut total_time = slot as f64 * GRID_HANDICAP_SECONDS;
            let mut crashed = false;
            let mut completed_laps = 0;

            for lap in laps {
                match lap.time_of(slot) {
                    Some(lap_time) if lap_time.crashed => crashed = true,
                    Some(lap_time) if !crashed => {
                        total_time += lap_time.time;
                        completed_laps += 1;
                    }
                    _ => {}
                }
            }

            LeaderboardEntry {
                position: slot + 1,
                slot,
                car_id: entrant.car_id,
                uri: entrant.uri.clone(),
                driver_number: entrant.driver_number,
                laps: completed_laps,
                time: if crashed { RaceTime::Crashed } else { RaceTime::Elapsed(total_time) },
                crashed,
            }
        })
        .collect()
}
