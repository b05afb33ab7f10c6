//! On-disk session archive.
//!
//! ```text
//! <root>/<year>/schedule.json
//! <root>/<year>/<event slug>/<session code>/session.json
//! <root>/<year>/<event slug>/<session code>/telemetry.csv   (or telemetry.ndjson)
//! ```

use anyhow::Result;
use lapline_provider_core::{match_event, LoadOptions, ProviderError, SessionProvider};
use model::{CircuitInfo, EventInfo, Lap, Session, SessionId, SessionKind};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, warn};

mod telemetry;

pub use telemetry::{
    export_telemetry_csv, export_telemetry_ndjson, import_telemetry_csv, import_telemetry_ndjson,
    LapSamples,
};

const SCHEDULE_FILE: &str = "schedule.json";
const MANIFEST_FILE: &str = "session.json";
const TELEMETRY_CSV: &str = "telemetry.csv";
const TELEMETRY_NDJSON: &str = "telemetry.ndjson";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TelemetryFormat {
    Csv,
    Ndjson,
}

/// Directory-friendly form of an event name: "São Paulo Grand Prix" -> "s_o_paulo_grand_prix".
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut gap = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if gap && !out.is_empty() {
                out.push('_');
            }
            gap = false;
            out.push(c.to_ascii_lowercase());
        } else {
            gap = true;
        }
    }
    out
}

pub fn session_dir(root: &Path, id: &SessionId) -> PathBuf {
    root.join(id.year.to_string()).join(slug(&id.event)).join(id.kind.code())
}

#[derive(Serialize, Deserialize)]
struct SessionManifest {
    #[serde(default)]
    drivers: Vec<String>,
    #[serde(default)]
    circuit: Option<CircuitInfo>,
    #[serde(default)]
    laps: Vec<Lap>,
}

/// [`SessionProvider`] reading an archive tree rooted at `root`.
#[derive(Clone, Debug)]
pub struct ArchiveProvider {
    root: PathBuf,
}

impl ArchiveProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

async fn blocking<T, F>(f: F) -> Result<T, ProviderError>
where
    F: FnOnce() -> Result<T, ProviderError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ProviderError::Other(anyhow::anyhow!("archive task failed: {e}")))?
}

#[async_trait::async_trait]
impl SessionProvider for ArchiveProvider {
    async fn event_schedule(&self, year: i32) -> Result<Vec<EventInfo>, ProviderError> {
        let root = self.root.clone();
        blocking(move || read_schedule(&root, year)).await
    }

    async fn resolve_session(
        &self,
        year: i32,
        event: &str,
        kind: SessionKind,
    ) -> Result<SessionId, ProviderError> {
        let root = self.root.clone();
        let event = event.to_string();
        blocking(move || resolve_in_archive(&root, year, &event, kind)).await
    }

    async fn load(&self, id: &SessionId, options: LoadOptions) -> Result<Arc<Session>, ProviderError> {
        let root = self.root.clone();
        let id = id.clone();
        let session = blocking(move || read_session(&root, &id, options)).await?;
        Ok(Arc::new(session))
    }
}

fn resolve_in_archive(root: &Path, year: i32, event: &str, kind: SessionKind) -> Result<SessionId, ProviderError> {
    let schedule = read_schedule(root, year)?;
    let found = match_event(&schedule, event)
        .ok_or_else(|| ProviderError::session_not_found(year, event, kind))?;
    let id = SessionId { year, event: found.name.clone(), kind };
    if session_dir(root, &id).join(MANIFEST_FILE).is_file() {
        Ok(id)
    } else {
        Err(ProviderError::session_not_found(year, event, kind))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ProviderError> {
    let f = File::open(path).map_err(|e| ProviderError::file_error(path, e))?;
    serde_json::from_reader(BufReader::new(f))
        .map_err(|e| ProviderError::parse(path.display().to_string(), e))
}

fn read_schedule(root: &Path, year: i32) -> Result<Vec<EventInfo>, ProviderError> {
    let path = root.join(year.to_string()).join(SCHEDULE_FILE);
    match read_json::<Vec<EventInfo>>(&path) {
        Err(ProviderError::File { source, .. }) if source.kind() == ErrorKind::NotFound => {
            Err(ProviderError::ScheduleNotFound { year })
        }
        other => other,
    }
}

fn read_session(root: &Path, id: &SessionId, options: LoadOptions) -> Result<Session, ProviderError> {
    let dir = session_dir(root, id);
    let manifest = match read_json::<SessionManifest>(&dir.join(MANIFEST_FILE)) {
        Err(ProviderError::File { source, .. }) if source.kind() == ErrorKind::NotFound => {
            return Err(ProviderError::session_not_found(id.year, id.event.clone(), id.kind));
        }
        other => other?,
    };

    let mut session = Session::new(id.clone());
    session.drivers = manifest.drivers;
    session.circuit = manifest.circuit;
    if options.laps {
        session.laps = manifest.laps;
    }
    if options.telemetry {
        let csv = dir.join(TELEMETRY_CSV);
        let ndjson = dir.join(TELEMETRY_NDJSON);
        session.telemetry = if csv.is_file() {
            import_telemetry_csv(&csv)?
        } else if ndjson.is_file() {
            import_telemetry_ndjson(&ndjson)?
        } else {
            warn!(session = %id, dir = %dir.display(), "No telemetry file in session directory");
            Default::default()
        };
    }

    debug!(
        session = %id,
        drivers = session.drivers.len(),
        laps = session.laps.len(),
        telemetry_laps = session.telemetry.len(),
        "Loaded session from archive"
    );
    Ok(session)
}

pub fn write_schedule(root: &Path, year: i32, events: &[EventInfo]) -> Result<()> {
    let dir = root.join(year.to_string());
    std::fs::create_dir_all(&dir)?;
    write_json(&dir.join(SCHEDULE_FILE), &events)
}

/// Writes `session.json` and returns the session directory.
pub fn write_session_manifest(root: &Path, session: &Session) -> Result<PathBuf> {
    let dir = session_dir(root, &session.id);
    std::fs::create_dir_all(&dir)?;
    let manifest = SessionManifest {
        drivers: session.drivers.clone(),
        circuit: session.circuit.clone(),
        laps: session.laps.clone(),
    };
    write_json(&dir.join(MANIFEST_FILE), &manifest)?;
    Ok(dir)
}

/// Writes a full session (manifest and telemetry) into the archive.
pub fn write_session(root: &Path, session: &Session, format: TelemetryFormat) -> Result<PathBuf> {
    let dir = write_session_manifest(root, session)?;
    match format {
        TelemetryFormat::Csv => export_telemetry_csv(session, &dir.join(TELEMETRY_CSV))?,
        TelemetryFormat::Ndjson => export_telemetry_ndjson(session, &dir.join(TELEMETRY_NDJSON))?,
    }
    Ok(dir)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let f = File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, value)?;
    w.flush()?;
    Ok(())
}
