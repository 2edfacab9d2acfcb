use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::errors::{AlreadyQualifiedSnafu, CustomResult, NoEntrantsSnafu};
use crate::modules::catalog::Catalog;
use crate::modules::models::entrant::Entrant;
use crate::modules::models::race::Race;
use crate::modules::models::track::TrackType;

/// # how the starting grid of a race is determined
/// the two strategies are selected explicitly and give different grids.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum QualifyingStrategy {
    /// a uniform shuffle of the entrants
    Random,
    /// entrants ordered by driver skill for the track type, best first
    BySkill {
        #[serde(rename = "trackType")]
        track_type: TrackType,
    },
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GridPosition {
    pub slot: usize,
    pub car_id: i32,
    #[serde(default)]
    pub driver_number: Option<i32>,
    /// only set by skill based qualifying
    #[serde(default)]
    pub skill: Option<u32>,
    pub starting_position: usize,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StartingGrid {
    pub strategy: QualifyingStrategy,
    pub positions: Vec<GridPosition>,
}

impl StartingGrid {
    /// # the entrant slots in starting order
    pub fn slots(&self) -> Vec<usize> {
        self.positions.iter().map(|p| p.slot).collect()
    }
}

impl Race {
    /// # run qualifying with the given strategy
    /// the first qualifying run wins; the grid locks the entrant list.
    ///
    /// ## Arguments
    /// * `catalog` - used to look up driver skills
    /// * `strategy` - how to order the grid
    /// * `rng` - the random source for random qualifying
    ///
    /// ## Returns
    /// * `StartingGrid` - the locked grid
    pub fn qualify(
        &mut self,
        catalog: &dyn Catalog,
        strategy: QualifyingStrategy,
        rng: &mut impl Rng,
    ) -> CustomResult<StartingGrid> {
        match strategy {
            QualifyingStrategy::Random => self.qualify_random(rng),
            QualifyingStrategy::BySkill { track_type } => self.qualify_by_skill(catalog, track_type),
        }
    }

    /// # qualify by shuffling the entrants
    pub fn qualify_random(&mut self, rng: &mut impl Rng) -> CustomResult<StartingGrid> {
        self.ensure_can_qualify()?;

        let positions = random_grid(&self.entrants, rng);
        Ok(self.lock_grid(QualifyingStrategy::Random, positions))
    }

    /// # qualify by driver skill for the track type
    pub fn qualify_by_skill(
        &mut self,
        catalog: &dyn Catalog,
        track_type: TrackType,
    ) -> CustomResult<StartingGrid> {
        self.ensure_can_qualify()?;

        let positions = skill_grid(self.id, &self.entrants, catalog, track_type);
        Ok(self.lock_grid(QualifyingStrategy::BySkill { track_type }, positions))
    }

    fn ensure_can_qualify(&self) -> CustomResult<()> {
        ensure!(!self.is_qualified(), AlreadyQualifiedSnafu { race_id: self.id });
        ensure!(!self.entrants.is_empty(), NoEntrantsSnafu { race_id: self.id });
        Ok(())
    }

    fn lock_grid(&mut self, strategy: QualifyingStrategy, positions: Vec<GridPosition>) -> StartingGrid {
        let grid = StartingGrid { strategy, positions };
        self.starting_grid = Some(grid.clone());

        info!(target: "models/grid:qualify", "race {} qualified ({:?}): {:?}", self.id, strategy, grid.slots());

        grid
    }
}

fn random_grid(entrants: &[Entrant], rng: &mut impl Rng) -> Vec<GridPosition> {
    let mut slots: Vec<usize> = (0..entrants.len()).collect();
    slots.shuffle(rng);

    slots
        .into_iter()
        .enumerate()
        .map(|(starting_position, slot)| GridPosition {
            slot,
            car_id: entrants[slot].car_id,
            driver_number: entrants[slot].driver_number,
            skill: None,
            starting_position,
        })
        .collect()
}

/// # order the entrants by driver skill
/// the driver of an entrant is the entered driver, or else the driver assigned
/// to the car. An entrant without a resolvable driver gets skill 0.
fn skill_grid(
    race_id: i32,
    entrants: &[Entrant],
    catalog: &dyn Catalog,
    track_type: TrackType,
) -> Vec<GridPosition> {
    let mut rated: Vec<GridPosition> = entrants
        .iter()
        .enumerate()
        .map(|(slot, entrant)| {
            let driver = entrant
                .driver_number
                .or_else(|| catalog.car(entrant.car_id).and_then(|car| car.driver_number))
                .and_then(|number| catalog.driver(number));

            let (driver_number, skill) = match driver {
                Some(driver) => (Some(driver.number), driver.skill_for(track_type)),
                None => {
                    warn!(target: "models/grid:skill_grid",
                        "No driver found for car {} in race {}. Setting skill to 0.", entrant.car_id, race_id);
                    (None, 0)
                }
            };

            GridPosition {
                slot,
                car_id: entrant.car_id,
                driver_number,
                skill: Some(skill),
                starting_position: 0,
            }
        })
        .collect();

    // sort_by is stable, equal skills keep slot order
    rated.sort_by(|a, b| b.skill.cmp(&a.skill));
    for (starting_position, position) in rated.iter_mut().enumerate() {
        position.starting_position = starting_position;
    }

    rated
}
