//! Hand-built sessions shared by the unit tests.

use model::{CircuitInfo, Corner, Lap, LapKey, Session, SessionId, SessionKind, TelemetrySample};
use std::time::Duration;

pub fn lap(driver: &str, lap_number: u32, lap_time_s: Option<f64>) -> Lap {
    Lap {
        driver: driver.into(),
        lap_number,
        lap_time: lap_time_s.map(Duration::from_secs_f64),
        deleted: false,
    }
}

pub fn sample(session_time_s: f64, distance: f64, speed: f64, x: f64, y: f64) -> TelemetrySample {
    TelemetrySample {
        session_time: Duration::from_secs_f64(session_time_s),
        distance,
        speed,
        throttle: 100.0,
        brake: false,
        x,
        y,
    }
}

/// Evenly spaced samples starting at `t0` seconds, 0.25s and 20m apart.
pub fn run(t0: f64, n: usize) -> Vec<TelemetrySample> {
    (0..n)
        .map(|i| {
            let f = i as f64;
            let mut s = sample(t0 + f * 0.25, f * 20.0, 200.0 + f, 100.0 + f * 3.0, -50.0 + f * 2.0);
            s.brake = i % 3 == 0;
            s
        })
        .collect()
}

pub fn session() -> Session {
    Session::new(SessionId { year: 2025, event: "Abu Dhabi Grand Prix".into(), kind: SessionKind::Qualifying })
}

pub fn with_lap(mut session: Session, lap: Lap, samples: Vec<TelemetrySample>) -> Session {
    if !session.drivers.contains(&lap.driver) {
        session.drivers.push(lap.driver.clone());
    }
    session.telemetry.insert(LapKey::from(&lap), samples);
    session.laps.push(lap);
    session
}

pub fn circuit(rotation: f64) -> CircuitInfo {
    CircuitInfo {
        rotation,
        corners: vec![
            Corner { number: 1, letter: None, x: 10.0, y: 0.0, distance: 250.0 },
            Corner { number: 2, letter: Some("a".into()), x: 0.0, y: 20.0, distance: 610.0 },
        ],
    }
}
