use serde::{Deserialize, Serialize};

use crate::modules::models::track::TrackType;

/// # how well a car suits each kind of track
/// the two values are complementary and must sum to 100
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub struct Suitability {
    pub race: u32,
    pub street: u32,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: i32,
    #[serde(default)]
    pub driver_number: Option<i32>,
    pub suitability: Suitability,
    pub reliability: u32,
}

impl Car {
    /// # get the suitability for a track type
    ///
    /// ## Arguments
    /// * `track_type` - the type of the track the car is driving on
    ///
    /// ## Returns
    /// * `u32` - the suitability value that applies to the track type
    pub fn suitability_for(&self, track_type: TrackType) -> u32 {
        match track_type {
            TrackType::Race => self.suitability.race,
            TrackType::Street => self.suitability.street,
        }
    }

    pub fn has_valid_suitability(&self) -> bool {
        self.suitability.race.checked_add(self.suitability.street) == Some(100)
    }

    /// # build the uri of the car
    /// the uri is the car reference stored on an entrant
    pub fn uri(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(race: u32, street: u32) -> Car {
        Car {
            id: 7,
            driver_number: Some(44),
            suitability: Suitability { race, street },
            reliability: 80,
        }
    }

    #[test]
    fn suitability_follows_track_type() {
        let car = car(70, 30);
        assert_eq!(car.suitability_for(TrackType::Race), 70);
        assert_eq!(car.suitability_for(TrackType::Street), 30);
    }

    #[test]
    fn suitability_must_sum_to_hundred() {
        assert!(car(60, 40).has_valid_suitability());
        assert!(!car(60, 60).has_valid_suitability());
    }

    #[test]
    fn huge_suitability_is_invalid() {
        assert!(!car(u32::MAX, 1).has_valid_suitability());
        assert!(!car(u32::MAX, u32::MAX).has_valid_suitability());
    }

    #[test]
    fn uri_ignores_trailing_slash() {
        assert_eq!(car(50, 50).uri("https://TeamVM/car/"), "https://TeamVM/car/7");
    }
}
