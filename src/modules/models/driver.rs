use serde::{Deserialize, Serialize};

use crate::modules::models::track::TrackType;

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub struct Skill {
    pub race: u32,
    pub street: u32,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub number: i32,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub name: String,
    pub skill: Skill,
}

impl Driver {
    /// # get the skill of the driver for a track type
    ///
    /// ## Arguments
    /// * `track_type` - the type of the track
    ///
    /// ## Returns
    /// * `u32` - `skill.race` on a race track, `skill.street` on a street track
    pub fn skill_for(&self, track_type: TrackType) -> u32 {
        match track_type {
            TrackType::Race => self.skill.race,
            TrackType::Street => self.skill.street,
        }
    }

    pub fn has_valid_skill(&self) -> bool {
        self.skill.race.checked_add(self.skill.street) == Some(100)
    }
}
