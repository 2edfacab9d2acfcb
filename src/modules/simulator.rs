use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::CustomResult;
use crate::models::NewLapTime;
use crate::modules::helpers::math::Math;
use crate::modules::models::car::Car;
use crate::modules::models::track::TrackType;

/// skill assumed for every driver when simulating a lap
pub const DRIVER_SKILL_BASELINE: f64 = 100.0;
/// upper bound (exclusive) of the random seconds added to a lap
pub const MAX_RANDOMNESS: f64 = 5.0;

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct LapConditions {
    pub reliability: u32,
    pub suitability: u32,
    pub base_lap_time: f64,
    pub track_type: TrackType,
}

impl LapConditions {
    /// # the conditions of a car on a track
    /// the suitability is picked by the track type
    pub fn for_car(car: &Car, base_lap_time: f64, track_type: TrackType) -> LapConditions {
        LapConditions {
            reliability: car.reliability,
            suitability: car.suitability_for(track_type),
            base_lap_time,
            track_type,
        }
    }
}

/// # the outcome of a simulated lap
/// a crash always has a time of 0
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy)]
pub struct LapResult {
    pub time: f64,
    pub crashed: bool,
    pub randomness: f64,
}

impl LapResult {
    pub fn to_new_lap_time(&self) -> NewLapTime {
        NewLapTime {
            time: self.time,
            crashed: self.crashed,
        }
    }
}

pub struct LapSimulator {}

impl LapSimulator {
    /// # simulate a single lap
    /// a draw in `[0, reliability + margin)` that lands at or above the
    /// reliability is a crash. Otherwise the lap time is the base lap time
    /// plus a speed term and up to 5 seconds of randomness.
    ///
    /// ## Arguments
    /// * `rng` - the random source
    /// * `conditions` - the car and track the lap is driven with
    ///
    /// ## Returns
    /// * `LapResult` - the lap time rounded to 3 decimals, or a crash
    pub fn simulate(rng: &mut impl Rng, conditions: &LapConditions) -> LapResult {
        let max_random = LapSimulator::crash_threshold(conditions.reliability, conditions.track_type);
        let crashed = rng.gen_range(0..max_random) >= conditions.reliability;

        let randomness = rng.gen_range(0.0..MAX_RANDOMNESS);

        let time = if crashed {
            0.0
        } else {
            let speed = (conditions.suitability as f64
                + DRIVER_SKILL_BASELINE
                + (100.0 - conditions.reliability as f64))
                / 3.0;
            let lap_time = conditions.base_lap_time + (10.0 * speed / 100.0);

            Math::round_float_to_n_decimals(lap_time + randomness, 3)
        };

        let result = LapResult {
            time,
            crashed,
            randomness: Math::round_float_to_n_decimals(randomness, 3),
        };

        debug!(target: "simulator:simulate", "{:?} -> {:?}", conditions, result);

        result
    }

    /// # simulate a lap from raw values
    /// the track type is validated before anything is drawn from `rng`
    ///
    /// ## Arguments
    /// * `rng` - the random source
    /// * `reliability` - the reliability of the car
    /// * `suitability` - the suitability of the car for the track type
    /// * `base_lap_time` - the base lap time of the track in seconds
    /// * `track_type` - `race` or `street`
    ///
    /// ## Returns
    /// * `LapResult` - the simulated lap
    pub fn simulate_raw(
        rng: &mut impl Rng,
        reliability: u32,
        suitability: u32,
        base_lap_time: f64,
        track_type: &str,
    ) -> CustomResult<LapResult> {
        let track_type: TrackType = track_type.parse()?;

        Ok(LapSimulator::simulate(rng, &LapConditions {
            reliability,
            suitability,
            base_lap_time,
            track_type,
        }))
    }

    /// # the exclusive upper bound of the crash draw
    /// street tracks are less forgiving than race tracks
    pub fn crash_threshold(reliability: u32, track_type: TrackType) -> u32 {
        match track_type {
            TrackType::Street => reliability.saturating_add(10),
            TrackType::Race => reliability.saturating_add(5),
        }
    }
}
