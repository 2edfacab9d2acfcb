use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRace {
    pub track_id: i32,
    pub name: String,
}

#[derive(Serialize, Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntrant {
    pub car_id: i32,
    #[serde(default)]
    pub driver_number: Option<i32>,
}

/// # one entrant's result as submitted for a lap
/// the position in the submitted array is the entrant slot
#[derive(Serialize, Debug, Clone, Copy, Deserialize, PartialEq, Default)]
pub struct NewLapTime {
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub crashed: bool,
}

impl NewLapTime {
    pub fn finished(time: f64) -> NewLapTime {
        NewLapTime { time, crashed: false }
    }

    pub fn crashed() -> NewLapTime {
        NewLapTime { time: 0.0, crashed: true }
    }
}
