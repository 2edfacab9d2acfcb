use rand::rngs::mock::StepRng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use race_director::errors::Error;
use race_director::models::{NewEntrant, NewLapTime, NewRace};
use race_director::modules::catalog::InMemoryCatalog;
use race_director::modules::leaderboard::RaceTime;
use race_director::modules::models::car::{Car, Suitability};
use race_director::modules::models::driver::{Driver, Skill};
use race_director::modules::models::track::{Track, TrackType};
use race_director::modules::race_service::RaceService;
use race_director::modules::store::MemoryRaceStore;

type Service = RaceService<MemoryRaceStore, InMemoryCatalog>;

fn track(id: i32, track_type: TrackType, total_laps: u32) -> Track {
    Track {
        id,
        name: format!("Track {}", id),
        track_type,
        total_laps,
        base_lap_time: 90.0,
    }
}

fn car(id: i32, driver_number: i32) -> Car {
    Car {
        id,
        driver_number: Some(driver_number),
        suitability: Suitability { race: 60, street: 40 },
        reliability: 80,
    }
}

fn driver(number: i32, race: u32, street: u32) -> Driver {
    Driver {
        number,
        short_name: format!("D{}", number),
        name: format!("Driver {}", number),
        skill: Skill { race, street },
    }
}

fn service() -> Service {
    let catalog = InMemoryCatalog::new()
        .with_track(track(1, TrackType::Race, 3))
        .with_track(track(2, TrackType::Street, 10))
        .with_car(car(1, 7))
        .with_car(car(2, 8))
        .with_car(car(3, 9))
        .with_driver(driver(7, 90, 10))
        .with_driver(driver(8, 40, 60))
        .with_driver(driver(9, 50, 50));

    RaceService::new(MemoryRaceStore::new(), catalog, "https://TeamVM/car")
}

fn race_on(service: &Service, track_id: i32, car_ids: &[i32]) -> i32 {
    let race = service
        .create_race(NewRace { track_id, name: "Grand Prix".to_string() })
        .unwrap();

    for &car_id in car_ids {
        service.add_entrant(race.id, NewEntrant { car_id, driver_number: None }).unwrap();
    }

    race.id
}

#[test]
fn crash_on_first_lap_shows_on_leaderboard() {
    let service = service();
    let race_id = race_on(&service, 1, &[1, 2]);
    service.qualify_random(race_id, &mut StepRng::new(0, 0)).unwrap();

    let lap = service
        .add_lap(race_id, &[NewLapTime::finished(95.0), NewLapTime { time: 12.0, crashed: true }])
        .unwrap();
    assert_eq!(lap.number, 1);
    assert_eq!(lap.lap_times[1].time, 0.0);

    let leaderboard = service.get_leaderboard(race_id, None).unwrap();
    assert_eq!(leaderboard.lap, 1);

    let first = &leaderboard.entrants[0];
    assert_eq!(first.time, RaceTime::Elapsed(95.0));
    assert_eq!(first.laps, 1);
    assert!(!first.crashed);

    let second = &leaderboard.entrants[1];
    assert!(second.crashed);
    assert_eq!(second.time.as_secs(), f64::INFINITY);
}

#[test]
fn skill_qualifying_puts_better_race_driver_first() {
    let service = service();
    let race_id = race_on(&service, 1, &[2, 1]);

    let grid = service.qualify_by_skill(race_id, TrackType::Race).unwrap();

    // car 1 (skill 90) entered second but starts first
    assert_eq!(grid.positions[0].car_id, 1);
    assert_eq!(grid.positions[0].skill, Some(90));
    assert_eq!(grid.positions[0].starting_position, 0);
    assert_eq!(grid.positions[1].car_id, 2);
}

#[test]
fn street_lap_time_is_a_crash_or_at_least_the_base_time() {
    let service = service();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    for _ in 0..500 {
        let result = service.simulate_lap_time(&mut rng, 80, 60, 90.0, "street").unwrap();
        if result.crashed {
            assert_eq!(result.time, 0.0);
        } else {
            assert!(result.time.is_finite() && result.time >= 90.0);
        }
    }
}

#[test]
fn entrants_are_locked_once_qualified() {
    let service = service();
    let race_id = race_on(&service, 1, &[1, 2]);

    service.remove_entrant(race_id, 2).unwrap();
    service.add_entrant(race_id, NewEntrant { car_id: 2, driver_number: Some(8) }).unwrap();
    service.qualify_random(race_id, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();

    assert!(matches!(
        service.add_entrant(race_id, NewEntrant { car_id: 3, driver_number: None }).unwrap_err(),
        Error::AlreadyQualified { .. }
    ));
    assert!(matches!(
        service.remove_entrant(race_id, 1).unwrap_err(),
        Error::AlreadyQualified { .. }
    ));
    assert_eq!(service.get_race(race_id).unwrap().entrants.len(), 2);
}

#[test]
fn full_race_runs_to_the_lap_limit() {
    let service = service();
    let race_id = race_on(&service, 1, &[1, 2, 3]);
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    assert!(matches!(
        service.qualify_random(race_on(&service, 1, &[]), &mut rng).unwrap_err(),
        Error::NoEntrants { .. }
    ));

    service.qualify_by_skill(race_id, TrackType::Race).unwrap();
    for number in 1..=3 {
        assert_eq!(service.simulate_lap(race_id, &mut rng).unwrap().number, number);
    }

    assert!(matches!(
        service.add_lap(race_id, &[NewLapTime::finished(90.0); 3]).unwrap_err(),
        Error::LapLimitExceeded { total_laps: 3, .. }
    ));

    let final_board = service.get_leaderboard(race_id, None).unwrap();
    assert_eq!(final_board.lap, 3);
    assert_eq!(final_board.entrants.len(), 3);
    for entry in &final_board.entrants {
        assert!(entry.crashed || entry.laps == 3);
    }

    assert_eq!(service.get_leaderboard(race_id, Some(9)).unwrap().entrants, final_board.entrants);
    assert!(matches!(service.get_lap(race_id, 4).unwrap_err(), Error::LapNotFound { lap_number: 4, .. }));
    assert_eq!(service.list_races().unwrap().len(), 2);
}

#[test]
fn lap_must_have_a_time_per_entrant() {
    let service = service();
    let race_id = race_on(&service, 2, &[1, 2]);
    service.qualify_by_skill(race_id, TrackType::Street).unwrap();

    assert!(matches!(
        service.add_lap(race_id, &[NewLapTime::finished(90.0)]).unwrap_err(),
        Error::EntrantCountMismatch { expected: 2, actual: 1 }
    ));
    assert!(matches!(
        service.get_leaderboard(race_id, Some(0)).unwrap_err(),
        Error::InvalidLapNumber
    ));
}

#[test]
fn laps_before_qualifying_are_refused() {
    let service = service();
    let race_id = race_on(&service, 1, &[1, 2]);

    assert!(matches!(
        service.add_lap(race_id, &[NewLapTime::finished(95.0), NewLapTime::crashed()]).unwrap_err(),
        Error::NotQualified { .. }
    ));

    service.remove_entrant(race_id, 1).unwrap();
    service.qualify_random(race_id, &mut StepRng::new(0, 0)).unwrap();
    service.add_lap(race_id, &[NewLapTime::crashed()]).unwrap();

    let leaderboard = service.get_leaderboard(race_id, None).unwrap();
    let entry = &leaderboard.entrants[0];
    assert_eq!(entry.car_id, 2);
    assert!(entry.crashed);
    assert_eq!(entry.laps, 0);
}

#[test]
fn unknown_race_is_reported() {
    let service = service();

    assert!(matches!(service.get_race(5).unwrap_err(), Error::RaceNotFound { race_id: 5 }));
    assert!(matches!(
        service.add_entrant(5, NewEntrant { car_id: 1, driver_number: None }).unwrap_err(),
        Error::RaceNotFound { race_id: 5 }
    ));
}
