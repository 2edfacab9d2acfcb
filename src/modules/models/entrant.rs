use log::info;
use serde::{Deserialize, Serialize};
use snafu::{ensure, OptionExt};

use crate::errors::{
    AlreadyQualifiedSnafu, CarHasNoDriverSnafu, CarNotFoundSnafu, CustomResult, DuplicateCarSnafu,
    DuplicateDriverSnafu, InvalidSkillSnafu, InvalidSuitabilitySnafu, NotEnteredSnafu,
    UnknownDriverSnafu,
};
use crate::models::NewEntrant;
use crate::modules::catalog::Catalog;
use crate::modules::models::race::Race;

/// # a car entered in a race
/// the slot of an entrant is its index in `Race::entrants`
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Entrant {
    pub car_id: i32,
    pub uri: String,
    #[serde(default)]
    pub driver_number: Option<i32>,
}

impl Race {
    /********** MODIFIERS **********/
    /// # add an entrant to the race
    /// the car must have a driver assigned and a suitability that sums to 100.
    /// when a driver number is given the driver must exist, must not be entered
    /// yet, and must have a skill that sums to 100.
    ///
    /// ## Arguments
    /// * `catalog` - where the car and driver records are looked up
    /// * `new_entrant` - the car and optional driver to enter
    /// * `car_uri_base` - the base of the car uri stored on the entrant
    ///
    /// ## Returns
    /// * `Entrant` - the entrant, placed in the next free slot
    pub fn add_entrant(
        &mut self,
        catalog: &dyn Catalog,
        new_entrant: NewEntrant,
        car_uri_base: &str,
    ) -> CustomResult<Entrant> {
        let car_id = new_entrant.car_id;

        ensure!(!self.is_qualified(), AlreadyQualifiedSnafu { race_id: self.id });
        ensure!(self.entrant_slot(car_id).is_none(), DuplicateCarSnafu { car_id });

        let car = catalog.car(car_id).context(CarNotFoundSnafu { car_id })?;
        ensure!(car.driver_number.is_some(), CarHasNoDriverSnafu { car_id });
        ensure!(
            car.has_valid_suitability(),
            InvalidSuitabilitySnafu {
                car_id,
                race: car.suitability.race,
                street: car.suitability.street,
            }
        );

        if let Some(driver_number) = new_entrant.driver_number {
            let driver = catalog
                .driver(driver_number)
                .context(UnknownDriverSnafu { driver_number })?;

            ensure!(
                !self.entrants.iter().any(|e| e.driver_number == Some(driver_number)),
                DuplicateDriverSnafu { driver_number }
            );
            ensure!(
                driver.has_valid_skill(),
                InvalidSkillSnafu {
                    driver_number,
                    race: driver.skill.race,
                    street: driver.skill.street,
                }
            );
        }

        let entrant = Entrant {
            car_id,
            uri: car.uri(car_uri_base),
            driver_number: new_entrant.driver_number,
        };
        self.entrants.push(entrant.clone());

        info!(target: "models/entrant:add_entrant", "car {} entered in race {} (slot: {})",
            car_id, self.id, self.entrants.len() - 1);

        Ok(entrant)
    }

    /// # remove an entrant from the race
    /// only possible before qualifying. The entrants behind the removed one
    /// move up a slot, which is fine as no laps can exist yet.
    ///
    /// ## Returns
    /// * `Entrant` - the removed entrant
    pub fn remove_entrant(&mut self, car_id: i32) -> CustomResult<Entrant> {
        ensure!(!self.is_qualified(), AlreadyQualifiedSnafu { race_id: self.id });

        let slot = self.entrant_slot(car_id).context(NotEnteredSnafu { car_id })?;
        let entrant = self.entrants.remove(slot);

        info!(target: "models/entrant:remove_entrant", "car {} removed from race {}", car_id, self.id);

        Ok(entrant)
    }

    /********** GETTERS **********/
    pub fn entrant_slot(&self, car_id: i32) -> Option<usize> {
        self.entrants.iter().position(|e| e.car_id == car_id)
    }

    /// # get the car uris of all entrants in slot order
    pub fn entrant_car_uris(&self) -> Vec<String> {
        self.entrants.iter().map(|e| e.uri.clone()).collect()
    }
}
