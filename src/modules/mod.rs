pub mod catalog;
pub mod leaderboard;
pub mod race_service;
pub mod redis;
pub mod simulator;
pub mod store;

pub mod models {
    pub mod car;
    pub mod driver;
    pub mod entrant;
    pub mod grid;
    pub mod lap;
    pub mod race;
    pub mod track;
}

pub mod helpers {
    pub mod config;
    pub mod logging;
    pub mod math;
}
