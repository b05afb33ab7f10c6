//! Session provider contract and shared plumbing used by Lapline

use model::{EventInfo, Session, SessionId, SessionKind};
use std::{path::PathBuf, sync::Arc};

mod cache;
mod memory;

pub use cache::CachedProvider;
pub use memory::MemoryProvider;

pub type Result<T, E = ProviderError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("No event schedule available for {year}")]
    ScheduleNotFound { year: i32 },

    #[error("Session not found: {year} '{event}' {kind}")]
    SessionNotFound { year: i32, event: String, kind: SessionKind },

    #[error("Archive file error at {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProviderError {
    pub fn session_not_found(year: i32, event: impl Into<String>, kind: SessionKind) -> Self {
        ProviderError::SessionNotFound { year, event: event.into(), kind }
    }

    pub fn file_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProviderError::File { path: path.into(), source }
    }

    pub fn parse(context: impl Into<String>, details: impl ToString) -> Self {
        ProviderError::Parse { context: context.into(), details: details.to_string() }
    }

    /// Bad year/event/session input rather than a provider fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::ScheduleNotFound { .. } | ProviderError::SessionNotFound { .. })
    }
}

/// Which parts of a session to materialize on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadOptions {
    pub laps: bool,
    pub telemetry: bool,
}

impl LoadOptions {
    pub fn full() -> Self {
        Self { laps: true, telemetry: true }
    }

    /// Driver list and circuit info only.
    pub fn metadata() -> Self {
        Self { laps: false, telemetry: false }
    }

    /// Drops whatever these options did not ask for.
    pub fn restrict(&self, session: &Session) -> Session {
        let mut out = Session::new(session.id.clone());
        out.drivers = session.drivers.clone();
        out.circuit = session.circuit.clone();
        if self.laps {
            out.laps = session.laps.clone();
        }
        if self.telemetry {
            out.telemetry = session.telemetry.clone();
        }
        out
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::full()
    }
}

/// Trait for any source of recorded sessions
///
/// Loading may hit disk or network and take seconds; everything downstream of
/// a loaded [`Session`] is pure.
#[async_trait::async_trait]
pub trait SessionProvider: Send + Sync {
    /// Events of a championship year in round order.
    async fn event_schedule(&self, year: i32) -> Result<Vec<EventInfo>>;

    /// Maps a loose event name onto a concrete session.
    async fn resolve_session(&self, year: i32, event: &str, kind: SessionKind) -> Result<SessionId>;

    async fn load(&self, id: &SessionId, options: LoadOptions) -> Result<Arc<Session>>;
}

/// Finds the event a user most likely meant.
///
/// Tries, in order: exact name, exact location, then a substring of the name
/// (so "Abu Dhabi" finds "Abu Dhabi Grand Prix"). All comparisons ignore case;
/// the first hit in schedule order wins.
pub fn match_event<'a>(schedule: &'a [EventInfo], query: &str) -> Option<&'a EventInfo> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return None;
    }
    schedule
        .iter()
        .find(|e| e.name.to_lowercase() == q)
        .or_else(|| schedule.iter().find(|e| e.location.to_lowercase() == q))
        .or_else(|| schedule.iter().find(|e| e.name.to_lowercase().contains(&q)))
}
