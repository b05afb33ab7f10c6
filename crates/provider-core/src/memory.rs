use crate::{match_event, LoadOptions, ProviderError, Result, SessionProvider};
use model::{EventInfo, Session, SessionId, SessionKind};
use std::{collections::HashMap, sync::Arc};

/// Provider over sessions already held in memory.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    schedules: HashMap<i32, Vec<EventInfo>>,
    sessions: HashMap<SessionId, Arc<Session>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(mut self, year: i32, event: EventInfo) -> Self {
        let events = self.schedules.entry(year).or_default();
        if !events.iter().any(|e| e.name == event.name) {
            events.push(event);
            events.sort_by_key(|e| e.round);
        }
        self
    }

    /// Adds a session, registering its event on the schedule when missing.
    pub fn with_session(mut self, session: Session) -> Self {
        let id = session.id.clone();
        let events = self.schedules.entry(id.year).or_default();
        if !events.iter().any(|e| e.name == id.event) {
            let round = events.iter().map(|e| e.round).max().map_or(1, |r| r + 1);
            events.push(EventInfo { round, name: id.event.clone(), location: String::new() });
        }
        self.sessions.insert(id, Arc::new(session));
        self
    }
}

#[async_trait::async_trait]
impl SessionProvider for MemoryProvider {
    async fn event_schedule(&self, year: i32) -> Result<Vec<EventInfo>> {
        self.schedules.get(&year).cloned().ok_or(ProviderError::ScheduleNotFound { year })
    }

    async fn resolve_session(&self, year: i32, event: &str, kind: SessionKind) -> Result<SessionId> {
        let schedule = self.schedules.get(&year).ok_or(ProviderError::ScheduleNotFound { year })?;
        let found = match_event(schedule, event)
            .ok_or_else(|| ProviderError::session_not_found(year, event, kind))?;
        let id = SessionId { year, event: found.name.clone(), kind };
        if self.sessions.contains_key(&id) {
            Ok(id)
        } else {
            Err(ProviderError::session_not_found(year, event, kind))
        }
    }

    async fn load(&self, id: &SessionId, options: LoadOptions) -> Result<Arc<Session>> {
        let session = self
            .sessions
            .get(id)
            .ok_or_else(|| ProviderError::session_not_found(id.year, id.event.clone(), id.kind))?;
        if options == LoadOptions::full() {
            Ok(session.clone())
        } else {
            Ok(Arc::new(options.restrict(session)))
        }
    }
}
