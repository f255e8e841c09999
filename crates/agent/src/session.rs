//! Per-conversation session state
//!
//! The session store is the only shared mutable resource in the pipeline.
//! Each session is checked out behind its own async mutex, so overlapping
//! turns from the same conversation serialize while different sessions
//! run fully in parallel. Turns work on a clone of the state and commit
//! it at the end, so an aborted turn never leaves partial mutations.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

/// How many recently used template indices to remember per family
const ROTATION_MEMORY: usize = 3;

/// Lightweight emotional read of the current message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    #[default]
    Neutral,
    Positive,
    Negative,
}

impl Sentiment {
    /// Keyword scan over the folded message
    pub fn detect(text: &str) -> Self {
        let folded = shop_agent_nlu::normalize::fold(text);

        const NEGATIVE: &[&str] = &[
            "pessimo", "horrivel", "ruim", "odeio", "raiva", "absurdo", "demora", "reclamar",
            "cansado", "chateado", "malo", "terrible", "odio", "enojado", "queja",
        ];
        const POSITIVE: &[&str] = &[
            "otimo", "adorei", "amei", "perfeito", "maravilha", "obrigado", "obrigada", "valeu",
            "excelente", "genial", "gracias", "perfecto", "buenisimo",
        ];

        if NEGATIVE.iter().any(|w| folded.contains(w)) {
            Self::Negative
        } else if POSITIVE.iter().any(|w| folded.contains(w)) {
            Self::Positive
        } else {
            Self::Neutral
        }
    }

    /// Tone label handed to the naturalization collaborator
    pub fn tone(&self) -> &'static str {
        match self {
            Self::Neutral => "neutro",
            Self::Positive => "animado",
            Self::Negative => "empatico",
        }
    }
}

/// Mutable per-conversation state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Last canonical product discussed
    pub focus: Option<String>,
    /// Last canonical category discussed
    pub category: Option<String>,
    /// Last raw product term, for debug and "same thing again" phrasing
    pub last_query: Option<String>,
    /// template family -> recently used variant indices (bounded)
    pub template_history: HashMap<String, VecDeque<usize>>,
    /// Messages handled in this session
    pub message_count: u64,
    /// Distinct visits; bumped when a session handles its first message,
    /// so a re-created session after eviction counts as a new visit
    pub visit_count: u64,
    /// Sentiment of the most recent message
    pub sentiment: Sentiment,
}

impl SessionState {
    /// Next template variant for a family, round-robin, skipping the
    /// indices used in the last few turns so phrasing does not repeat
    ///
    /// With fewer than two variants this degenerates to index 0. The skip
    /// window is `min(3, variant_count - 1)` so small families still
    /// terminate.
    pub fn next_template_variant(&mut self, family: &str, variant_count: usize) -> usize {
        if variant_count <= 1 {
            return 0;
        }

        let history = self.template_history.entry(family.to_string()).or_default();
        let window = ROTATION_MEMORY.min(variant_count - 1);

        let start = history.back().map(|last| (last + 1) % variant_count).unwrap_or(0);
        let recent: Vec<usize> = history.iter().rev().take(window).copied().collect();

        let mut candidate = start;
        for _ in 0..variant_count {
            if !recent.contains(&candidate) {
                break;
            }
            candidate = (candidate + 1) % variant_count;
        }

        history.push_back(candidate);
        while history.len() > ROTATION_MEMORY {
            history.pop_front();
        }
        candidate
    }
}

/// One checked-out session
pub struct SessionEntry {
    /// Serializes turns for this session; held across the whole turn
    pub state: tokio::sync::Mutex<SessionState>,
    last_activity: RwLock<Instant>,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            state: tokio::sync::Mutex::new(SessionState::default()),
            last_activity: RwLock::new(Instant::now()),
        }
    }

    /// Update the activity timestamp
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.read().elapsed()
    }
}

/// Pluggable session store
///
/// Injected into the agent so the pipeline itself carries no global
/// mutable state; a distributed implementation can replace the in-memory
/// one for multi-instance deployments.
pub trait SessionStore: Send + Sync {
    /// Fetch the session, creating a default one on first contact
    fn get_or_create(&self, id: &str) -> Arc<SessionEntry>;

    /// Remove the session outright
    fn remove(&self, id: &str);

    /// Purge sessions idle beyond `max_idle`; sessions currently serving
    /// a turn are skipped. Returns the number purged.
    fn evict_idle(&self, max_idle: Duration) -> usize;

    /// Active session count
    fn count(&self) -> usize;

    /// All session ids
    fn list(&self) -> Vec<String>;
}

/// In-memory session store for single-instance deployments
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Arc<SessionEntry>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_or_create(&self, id: &str) -> Arc<SessionEntry> {
        let mut sessions = self.sessions.lock();
        let entry = sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id = %id, "Created session");
                Arc::new(SessionEntry::new())
            })
            .clone();
        entry.touch();
        entry
    }

    fn remove(&self, id: &str) {
        if self.sessions.lock().remove(id).is_some() {
            tracing::info!(session_id = %id, "Removed session");
        }
    }

    fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|id, entry| {
            if entry.idle_for() <= max_idle {
                return true;
            }
            // A held turn lock means the session is mid-request; keep it
            if entry.state.try_lock().is_err() {
                tracing::debug!(session_id = %id, "Skipping eviction of busy session");
                return true;
            }
            tracing::info!(session_id = %id, "Evicted idle session");
            false
        });
        before - sessions.len()
    }

    fn count(&self) -> usize {
        self.sessions.lock().len()
    }

    fn list(&self) -> Vec<String> {
        self.sessions.lock().keys().cloned().collect()
    }
}
