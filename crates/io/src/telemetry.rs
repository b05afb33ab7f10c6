use anyhow::Result;
use lapline_provider_core::ProviderError;
use model::{LapKey, Session, TelemetrySample};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
    time::Duration,
};

pub type LapSamples = HashMap<LapKey, Vec<TelemetrySample>>;

/// Reads per-sample rows; file order is kept within each lap.
pub fn import_telemetry_csv(path: &Path) -> Result<LapSamples, ProviderError> {
    let file = File::open(path).map_err(|e| ProviderError::file_error(path, e))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut laps = LapSamples::new();
    for rec in rdr.deserialize() {
        let r: TelemetryRow = rec.map_err(|e| ProviderError::parse(path.display().to_string(), e))?;
        let session_time = Duration::try_from_secs_f64(r.session_time).map_err(|e| {
            ProviderError::parse(
                path.display().to_string(),
                format!("{} lap {}: session_time {}: {e}", r.driver, r.lap_number, r.session_time),
            )
        })?;
        laps.entry(LapKey::new(r.driver, r.lap_number)).or_default().push(TelemetrySample {
            session_time,
            distance: r.distance,
            speed: r.speed,
            throttle: r.throttle,
            brake: r.brake,
            x: r.x,
            y: r.y,
        });
    }
    Ok(laps)
}

/// Writes every lap in the session's lap table that has telemetry loaded.
pub fn export_telemetry_csv(session: &Session, path: &Path) -> Result<()> {
    let mut w = csv::Writer::from_path(path)?;
    for lap in session.laps() {
        let Some(samples) = session.lap_telemetry(lap) else { continue };
        for s in samples {
            w.serialize(TelemetryRow {
                driver: lap.driver.clone(),
                lap_number: lap.lap_number,
                session_time: s.session_time.as_secs_f64(),
                distance: s.distance,
                speed: s.speed,
                throttle: s.throttle,
                brake: s.brake,
                x: s.x,
                y: s.y,
            })?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Reads one lap per line; blank lines are skipped.
pub fn import_telemetry_ndjson(path: &Path) -> Result<LapSamples, ProviderError> {
    let f = File::open(path).map_err(|e| ProviderError::file_error(path, e))?;
    let rdr = BufReader::new(f);
    let mut laps = LapSamples::new();
    for (n, line) in rdr.lines().enumerate() {
        let s = line.map_err(|e| ProviderError::file_error(path, e))?;
        if s.trim().is_empty() {
            continue;
        }
        let l: LapTelemetry = serde_json::from_str(&s).map_err(|e| {
            ProviderError::parse(format!("{} line {}", path.display(), n + 1), e)
        })?;
        laps.entry(LapKey::new(l.driver, l.lap_number)).or_default().extend(l.samples);
    }
    Ok(laps)
}

pub fn export_telemetry_ndjson(session: &Session, path: &Path) -> Result<()> {
    let f = File::create(path)?;
    let mut w = BufWriter::new(f);
    for lap in session.laps() {
        let Some(samples) = session.lap_telemetry(lap) else { continue };
        let line = serde_json::to_string(&LapTelemetry {
            driver: lap.driver.clone(),
            lap_number: lap.lap_number,
            samples: samples.to_vec(),
        })?;
        writeln!(w, "{}", line)?;
    }
    w.flush()?;
    Ok(())
}

#[derive(Serialize, Deserialize)]
struct LapTelemetry {
    driver: String,
    lap_number: u32,
    samples: Vec<TelemetrySample>,
}

#[derive(Serialize, Deserialize)]
struct TelemetryRow {
    driver: String,
    lap_number: u32,
    session_time: f64,
    distance: f64,
    speed: f64,
    throttle: f64,
    #[serde(serialize_with = "flag_out", deserialize_with = "flag_in")]
    brake: bool,
    x: f64,
    y: f64,
}

fn flag_out<S: Serializer>(value: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(u8::from(*value))
}

/// Brake columns come as 0/1 from some exporters and true/false from others.
fn flag_in<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(d)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!("invalid brake flag '{other}'"))),
    }
}
