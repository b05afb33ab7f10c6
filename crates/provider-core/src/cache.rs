use crate::{LoadOptions, Result, SessionProvider};
use model::{EventInfo, Session, SessionId, SessionKind};
use parking_lot::Mutex;
use std::{collections::HashMap, hash::Hash, sync::Arc};
use tokio::sync::OnceCell;
use tracing::debug;

type Slots<K, V> = Mutex<HashMap<K, Arc<OnceCell<V>>>>;

/// Memoizing wrapper around another provider.
///
/// Each schedule year, each resolved (year, event, kind) and each
/// (session, options) pair is fetched at most once; concurrent callers for the
/// same key wait on the first fetch. Failed fetches drop their slot so the map
/// only holds successes and in-flight loads.
pub struct CachedProvider<P> {
    inner: P,
    schedules: Slots<i32, Arc<Vec<EventInfo>>>,
    resolved: Slots<(i32, String, SessionKind), SessionId>,
    sessions: Slots<(SessionId, LoadOptions), Arc<Session>>,
}

impl<P: SessionProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            schedules: Mutex::new(HashMap::new()),
            resolved: Mutex::new(HashMap::new()),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

fn slot<K: Eq + Hash, V>(slots: &Slots<K, V>, key: K) -> Arc<OnceCell<V>> {
    slots.lock().entry(key).or_default().clone()
}

/// Removes `cell` from the map if it is still the empty slot for `key`.
fn release<K: Eq + Hash, V>(slots: &Slots<K, V>, key: &K, cell: &Arc<OnceCell<V>>) {
    let mut map = slots.lock();
    if !cell.initialized() && map.get(key).is_some_and(|current| Arc::ptr_eq(current, cell)) {
        map.remove(key);
    }
}

async fn fetch_or_init<K, V, F, Fut>(slots: &Slots<K, V>, key: K, init: F) -> Result<V>
where
    K: Eq + Hash + Clone,
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<V>>,
{
    let cell = slot(slots, key.clone());
    match cell.get_or_try_init(init).await {
        Ok(value) => Ok(value.clone()),
        Err(err) => {
            release(slots, &key, &cell);
            Err(err)
        }
    }
}

#[async_trait::async_trait]
impl<P: SessionProvider> SessionProvider for CachedProvider<P> {
    async fn event_schedule(&self, year: i32) -> Result<Vec<EventInfo>> {
        let events = fetch_or_init(&self.schedules, year, || async {
            debug!(year, "Fetching event schedule");
            self.inner.event_schedule(year).await.map(Arc::new)
        })
        .await?;
        Ok(events.as_ref().clone())
    }

    async fn resolve_session(&self, year: i32, event: &str, kind: SessionKind) -> Result<SessionId> {
        fetch_or_init(&self.resolved, (year, event.to_string(), kind), || async {
            debug!(year, event, %kind, "Resolving session");
            self.inner.resolve_session(year, event, kind).await
        })
        .await
    }

    async fn load(&self, id: &SessionId, options: LoadOptions) -> Result<Arc<Session>> {
        fetch_or_init(&self.sessions, (id.clone(), options), || async {
            debug!(session = %id, ?options, "Loading session");
            self.inner.load(id, options).await
        })
        .await
    }
}
