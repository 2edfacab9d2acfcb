use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /********** RACE STATE **********/
    #[snafu(display("Qualifying has already taken place for race {race_id}"))]
    AlreadyQualified { race_id: i32 },

    #[snafu(display("Race {race_id} has not been qualified yet; laps can only be added after qualifying"))]
    NotQualified { race_id: i32 },

    #[snafu(display("There are no entrants in race {race_id}"))]
    NoEntrants { race_id: i32 },

    #[snafu(display("Cannot add more laps to race {race_id}; total lap count of {total_laps} reached"))]
    LapLimitExceeded { race_id: i32, total_laps: u32 },

    #[snafu(display("lapTimes must match the number of entrants (expected {expected}, got {actual})"))]
    EntrantCountMismatch { expected: usize, actual: usize },

    #[snafu(display("Lap time for entrant {entrant} is invalid: {time}"))]
    InvalidLapTime { entrant: usize, time: f64 },

    #[snafu(display("Lap number must be a positive integer"))]
    InvalidLapNumber,

    /********** ENTRANTS **********/
    #[snafu(display("Car {car_id} is already entered in the race"))]
    DuplicateCar { car_id: i32 },

    #[snafu(display("Driver {driver_number} is already entered in the race"))]
    DuplicateDriver { driver_number: i32 },

    #[snafu(display("Car {car_id} has no driver"))]
    CarHasNoDriver { car_id: i32 },

    #[snafu(display("The suitability values of car {car_id} do not sum to 100 (race: {race}, street: {street})"))]
    InvalidSuitability { car_id: i32, race: u32, street: u32 },

    #[snafu(display("The skill values of driver {driver_number} do not sum to 100 (race: {race}, street: {street})"))]
    InvalidSkill { driver_number: i32, race: u32, street: u32 },

    #[snafu(display("Driver {driver_number} does not exist"))]
    UnknownDriver { driver_number: i32 },

    #[snafu(display("Car {car_id} is not entered in the race"))]
    NotEntered { car_id: i32 },

    /********** TRACKS **********/
    #[snafu(display("Invalid track type: {track_type}. Use \"race\" or \"street\""))]
    InvalidTrackType { track_type: String },

    /********** LOOKUPS **********/
    #[snafu(display("Race {race_id} not found"))]
    RaceNotFound { race_id: i32 },

    #[snafu(display("Track {track_id} not found"))]
    TrackNotFound { track_id: i32 },

    #[snafu(display("Car {car_id} not found"))]
    CarNotFound { car_id: i32 },

    #[snafu(display("Lap {lap_number} not found in race {race_id}"))]
    LapNotFound { race_id: i32, lap_number: u32 },

    /********** INFRASTRUCTURE **********/
    #[snafu(display("Redis error while {action}: {source}"))]
    Storage {
        action: String,
        source: redis::RedisError,
    },

    #[snafu(display("Could not (de)serialize {what}: {source}"))]
    Serialization {
        what: String,
        source: serde_json::Error,
    },

    #[snafu(display("Could not read {path}: {source}"))]
    CatalogFile {
        path: String,
        source: std::io::Error,
    },
}

pub type CustomResult<T> = Result<T, Error>;
