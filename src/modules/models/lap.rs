use log::{debug, info};
use serde::{Deserialize, Serialize};
use snafu::{ensure, OptionExt};

use crate::errors::{
    CustomResult, EntrantCountMismatchSnafu, InvalidLapTimeSnafu, LapLimitExceededSnafu,
    LapNotFoundSnafu, NoEntrantsSnafu, NotQualifiedSnafu,
};
use crate::models::NewLapTime;
use crate::modules::models::race::Race;
use crate::modules::models::track::Track;

/// # the result of a single entrant in a lap
/// a crashed entrant always has a time of 0
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy)]
pub struct LapTime {
    pub entrant: usize,
    pub time: f64,
    pub crashed: bool,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Lap {
    pub number: u32,
    pub lap_times: Vec<LapTime>,
}

impl Lap {
    /// # get the result of an entrant
    ///
    /// ## Arguments
    /// * `slot` - the slot of the entrant
    ///
    /// ## Returns
    /// * `Option<&LapTime>` - the result, `None` if the lap has no entry for the slot
    pub fn time_of(&self, slot: usize) -> Option<&LapTime> {
        self.lap_times.iter().find(|lap_time| lap_time.entrant == slot)
    }
}

impl Race {
    /********** INSERTERS **********/
    /// # record the next lap of the race
    /// entry `i` of `lap_times` is the result of the entrant in slot `i`.
    /// the ledger stores whatever it is given; simulating the times is up to
    /// the caller.
    ///
    /// ## Arguments
    /// * `track` - the track of the race, limits the amount of laps
    /// * `lap_times` - one result per entrant in slot order
    ///
    /// ## Returns
    /// * `Lap` - the recorded lap
    pub fn add_lap(&mut self, track: &Track, lap_times: &[NewLapTime]) -> CustomResult<Lap> {
        ensure!(!self.entrants.is_empty(), NoEntrantsSnafu { race_id: self.id });
        ensure!(self.is_qualified(), NotQualifiedSnafu { race_id: self.id });
        ensure!(
            self.lap_count() < track.total_laps as usize,
            LapLimitExceededSnafu {
                race_id: self.id,
                total_laps: track.total_laps,
            }
        );
        ensure!(
            lap_times.len() == self.entrants.len(),
            EntrantCountMismatchSnafu {
                expected: self.entrants.len(),
                actual: lap_times.len(),
            }
        );

        for (entrant, lap_time) in lap_times.iter().enumerate() {
            ensure!(
                lap_time.crashed || (lap_time.time.is_finite() && lap_time.time >= 0.0),
                InvalidLapTimeSnafu { entrant, time: lap_time.time }
            );
        }

        let lap = Lap {
            number: self.lap_count() as u32 + 1,
            lap_times: lap_times
                .iter()
                .enumerate()
                .map(|(entrant, lap_time)| LapTime {
                    entrant,
                    time: if lap_time.crashed { 0.0 } else { lap_time.time },
                    crashed: lap_time.crashed,
                })
                .collect(),
        };

        debug!(target: "models/lap:add_lap", "lap {} of race {}: {:?}", lap.number, self.id, lap.lap_times);
        info!(target: "models/lap:add_lap", "recorded lap {}/{} of race {}", lap.number, track.total_laps, self.id);

        self.laps.push(lap.clone());
        Ok(lap)
    }

    /********** GETTERS **********/
    /// # get a lap by its number
    /// lap numbers start at 1
    pub fn lap(&self, lap_number: u32) -> CustomResult<&Lap> {
        self.laps
            .iter()
            .find(|lap| lap.number == lap_number)
            .context(LapNotFoundSnafu { race_id: self.id, lap_number })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::models::NewRace;
    use crate::modules::models::entrant::Entrant;
    use crate::modules::models::track::TrackType;
    use rand::rngs::mock::StepRng;

    fn track(total_laps: u32) -> Track {
        Track {
            id: 1,
            name: "Zandvoort".to_string(),
            track_type: TrackType::Race,
            total_laps,
            base_lap_time: 90.0,
        }
    }

    fn race(entrants: usize) -> Race {
        let mut race = Race::new(3, NewRace { track_id: 1, name: "Ledger".to_string() });
        race.entrants = (0..entrants)
            .map(|i| Entrant {
                car_id: i as i32 + 1,
                uri: format!("https://TeamVM/car/{}", i + 1),
                driver_number: None,
            })
            .collect();
        race
    }

    fn qualified_race(entrants: usize) -> Race {
        let mut race = race(entrants);
        race.qualify_random(&mut StepRng::new(0, 0)).unwrap();
        race
    }

    #[test]
    fn laps_are_numbered_from_one() {
        let track = track(3);
        let mut race = qualified_race(2);

        let first = race.add_lap(&track, &[NewLapTime::finished(95.0), NewLapTime::finished(96.5)]).unwrap();
        let second = race.add_lap(&track, &[NewLapTime::finished(94.0), NewLapTime::finished(93.0)]).unwrap();

        assert_eq!(first.number, 1);
        assert_eq!(second.number, 2);
        assert_eq!(race.lap(2).unwrap().time_of(1).unwrap().time, 93.0);
    }

    #[test]
    fn crashed_time_is_forced_to_zero() {
        let track = track(3);
        let mut race = qualified_race(2);

        let lap = race
            .add_lap(&track, &[NewLapTime::finished(95.0), NewLapTime { time: 123.4, crashed: true }])
            .unwrap();

        assert_eq!(lap.lap_times[1], LapTime { entrant: 1, time: 0.0, crashed: true });
    }

    #[test]
    fn crashed_entry_ignores_invalid_time() {
        let track = track(1);
        let mut race = qualified_race(1);

        let lap = race.add_lap(&track, &[NewLapTime { time: f64::NAN, crashed: true }]).unwrap();

        assert_eq!(lap.lap_times[0].time, 0.0);
    }

    #[test]
    fn rejects_laps_past_the_track_total() {
        let track = track(1);
        let mut race = qualified_race(1);
        race.add_lap(&track, &[NewLapTime::finished(90.0)]).unwrap();

        let error = race.add_lap(&track, &[NewLapTime::finished(90.0)]).unwrap_err();

        assert!(matches!(error, Error::LapLimitExceeded { race_id: 3, total_laps: 1 }));
        assert_eq!(race.lap_count(), 1);
    }

    #[test]
    fn rejects_wrong_amount_of_lap_times() {
        let error = qualified_race(2).add_lap(&track(3), &[NewLapTime::finished(90.0)]).unwrap_err();
        assert!(matches!(error, Error::EntrantCountMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn rejects_lap_without_entrants() {
        let error = race(0).add_lap(&track(3), &[]).unwrap_err();
        assert!(matches!(error, Error::NoEntrants { race_id: 3 }));
    }

    #[test]
    fn rejects_negative_time() {
        let error = qualified_race(2)
            .add_lap(&track(3), &[NewLapTime::finished(90.0), NewLapTime::finished(-1.0)])
            .unwrap_err();
        assert!(matches!(error, Error::InvalidLapTime { entrant: 1, .. }));
    }

    #[test]
    fn unknown_lap_number_is_not_found() {
        let error = race(1).lap(1).unwrap_err();
        assert!(matches!(error, Error::LapNotFound { race_id: 3, lap_number: 1 }));
    }

    #[test]
    fn rejects_lap_before_qualifying() {
        let mut race = race(2);

        let error = race
            .add_lap(&track(3), &[NewLapTime::finished(95.0), NewLapTime::crashed()])
            .unwrap_err();

        assert!(matches!(error, Error::NotQualified { race_id: 3 }));
        assert!(race.laps.is_empty());
    }

    // with laps recorded the grid is locked, so slots can't shift under them
    #[test]
    fn recorded_laps_keep_their_entrants() {
        let mut race = qualified_race(2);
        race.add_lap(&track(3), &[NewLapTime::finished(95.0), NewLapTime::crashed()]).unwrap();

        assert!(matches!(race.remove_entrant(1).unwrap_err(), Error::AlreadyQualified { race_id: 3 }));
        assert_eq!(race.entrants[0].car_id, 1);
        assert_eq!(race.laps[0].lap_times.len(), race.entrants.len());
    }
}
