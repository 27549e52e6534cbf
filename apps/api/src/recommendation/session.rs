//! Per-session ownership of the "current recommendation".
//!
//! Every request takes a `Ticket` before the network call. Sequence numbers are
//! monotonic per session; a completion whose ticket is not the latest one
//! issued for its session is discarded, so the last request *started* wins no
//! matter which reply arrives last. Only successful outcomes are stored.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::catalog::Coordinate;
use crate::recommendation::parser::RecommendationOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub session_id: Uuid,
    pub sequence: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredRecommendation {
    pub sequence: u64,
    pub campus_id: String,
    pub origin: Coordinate,
    pub outcome: RecommendationOutcome,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale { latest: u64 },
}

/// Sessions with nothing in flight and untouched for this long are evicted.
pub const DEFAULT_IDLE_TTL_MINUTES: i64 = 60;

#[derive(Debug)]
struct SessionSlot {
    latest: u64,
    in_flight: usize,
    current: Option<StoredRecommendation>,
    last_touched: DateTime<Utc>,
}

impl SessionSlot {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            latest: 0,
            in_flight: 0,
            current: None,
            last_touched: now,
        }
    }

    fn settle(&mut self, now: DateTime<Utc>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.last_touched = now;
    }
}

#[derive(Debug)]
pub struct RecommendationStore {
    sessions: Mutex<HashMap<Uuid, SessionSlot>>,
    idle_ttl: Duration,
}

impl Default for RecommendationStore {
    fn default() -> Self {
        Self::with_idle_ttl(Duration::minutes(DEFAULT_IDLE_TTL_MINUTES))
    }
}

impl RecommendationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_ttl,
        }
    }

    /// Issues the next ticket for `session_id`. The first ticket is 1.
    ///
    /// Idle sessions are pruned here, so the map only holds sessions that
    /// have a request in flight or were used within the idle TTL.
    pub async fn begin(&self, session_id: Uuid) -> Ticket {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;

        let cutoff = now - self.idle_ttl;
        let before = sessions.len();
        sessions.retain(|id, slot| {
            *id == session_id || slot.in_flight > 0 || slot.last_touched > cutoff
        });
        if sessions.len() < before {
            debug!("Evicted {} idle recommendation sessions", before - sessions.len());
        }

        let slot = sessions
            .entry(session_id)
            .or_insert_with(|| SessionSlot::new(now));
        slot.latest += 1;
        slot.in_flight += 1;
        slot.last_touched = now;
        Ticket {
            session_id,
            sequence: slot.latest,
        }
    }

    /// Replaces the current value if `ticket` is still the latest for its session.
    pub async fn complete(&self, ticket: Ticket, recommendation: StoredRecommendation) -> Completion {
        let mut sessions = self.sessions.lock().await;
        let Some(slot) = sessions.get_mut(&ticket.session_id) else {
            return Completion::Stale { latest: 0 };
        };
        slot.settle(Utc::now());
        if ticket.sequence != slot.latest {
            return Completion::Stale {
                latest: slot.latest,
            };
        }
        slot.current = Some(recommendation);
        Completion::Applied
    }

    /// Releases a ticket whose request failed. The current value is untouched.
    pub async fn abandon(&self, ticket: Ticket) {
        if let Some(slot) = self.sessions.lock().await.get_mut(&ticket.session_id) {
            slot.settle(Utc::now());
        }
    }

    pub async fn current(&self, session_id: Uuid) -> Option<StoredRecommendation> {
        self.sessions
            .lock()
            .await
            .get(&session_id)
            .and_then(|slot| slot.current.clone())
    }

    /// Drops the current value; returns whether there was one.
    ///
    /// A session with nothing in flight is removed outright. Otherwise the
    /// slot stays so in-flight requests remain ordered.
    pub async fn clear(&self, session_id: Uuid) -> bool {
        let mut sessions = self.sessions.lock().await;
        let Some(slot) = sessions.get_mut(&session_id) else {
            return false;
        };
        let had_value = slot.current.take().is_some();
        if slot.in_flight == 0 {
            sessions.remove(&session_id);
        }
        had_value
    }

    /// Number of sessions currently held.
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
