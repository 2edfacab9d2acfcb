use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, InvalidTrackTypeSnafu};

/// # the kind of circuit a track is
/// selects which of the split suitability/skill values applies
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Race,
    Street,
}

impl TrackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackType::Race => "race",
            TrackType::Street => "street",
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TrackType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "race" => Ok(TrackType::Race),
            "street" => Ok(TrackType::Street),
            other => InvalidTrackTypeSnafu { track_type: other }.fail(),
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub track_type: TrackType,
    pub total_laps: u32,
    pub base_lap_time: f64,
}
