//! Work timer.
//!
//! The session is a tagged union and every transition is a pure function of
//! `(session, event, now)`. Elapsed time is always recomputed from absolute
//! timestamps, so a session restored from storage after a restart keeps
//! counting correctly.
//!
//! [`Timer`] wires the pure machine to a [`Clock`] and a [`TimerStore`]
//! that is called after every applied transition.

use crate::core::clock::Clock;
use crate::core::{MIN_LOGGED_MINUTES, round_minutes};
use crate::errors::AppResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key under which the flat timer record is stored.
pub const STORAGE_KEY: &str = "productivity-timer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimerSession {
    #[default]
    Idle,
    Running {
        category_id: String,
        todo_id: Option<String>,
        started_at: DateTime<Utc>,
        last_resumed_at: DateTime<Utc>,
        /// Completed segments only; the open one is derived from `last_resumed_at`.
        accumulated_ms: u64,
    },
    Paused {
        category_id: String,
        todo_id: Option<String>,
        started_at: DateTime<Utc>,
        accumulated_ms: u64,
    },
}

impl TimerSession {
    pub fn status(&self) -> TimerStatus {
        match self {
            TimerSession::Idle => TimerStatus::Idle,
            TimerSession::Running { .. } => TimerStatus::Running,
            TimerSession::Paused { .. } => TimerStatus::Paused,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, TimerSession::Idle)
    }

    pub fn category_id(&self) -> Option<&str> {
        match self {
            TimerSession::Idle => None,
            TimerSession::Running { category_id, .. } | TimerSession::Paused { category_id, .. } => {
                Some(category_id)
            }
        }
    }

    pub fn todo_id(&self) -> Option<&str> {
        match self {
            TimerSession::Idle => None,
            TimerSession::Running { todo_id, .. } | TimerSession::Paused { todo_id, .. } => {
                todo_id.as_deref()
            }
        }
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self {
            TimerSession::Idle => None,
            TimerSession::Running { started_at, .. } | TimerSession::Paused { started_at, .. } => {
                Some(*started_at)
            }
        }
    }

    pub fn last_resumed_at(&self) -> Option<DateTime<Utc>> {
        match self {
            TimerSession::Running {
                last_resumed_at, ..
            } => Some(*last_resumed_at),
            _ => None,
        }
    }

    pub fn accumulated_ms(&self) -> u64 {
        match self {
            TimerSession::Idle => 0,
            TimerSession::Running { accumulated_ms, .. }
            | TimerSession::Paused { accumulated_ms, .. } => *accumulated_ms,
        }
    }

    /// Running time of the session as of `now`, paused intervals excluded.
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        match self {
            TimerSession::Running {
                last_resumed_at,
                accumulated_ms,
                ..
            } => accumulated_ms.saturating_add(segment_ms(*last_resumed_at, now)),
            other => other.accumulated_ms(),
        }
    }
}

/// Length of the open segment. A clock that went backwards counts as zero.
fn segment_ms(from: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((now - from).num_milliseconds()).unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    Start {
        category_id: String,
        todo_id: Option<String>,
    },
    Pause,
    Resume,
    Stop,
    Reset,
    UpdateCategory(String),
    /// Manual correction added straight to the accumulated time.
    Adjust { ms: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The event is not valid in the current state and changed nothing.
    Ignored,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Finalized session returned by `stop`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRecord {
    pub category_id: String,
    pub todo_id: Option<String>,
    /// Rounded to the nearest minute, never below [`MIN_LOGGED_MINUTES`].
    pub duration_minutes: i64,
    pub elapsed_ms: u64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub session: TimerSession,
    pub outcome: Outcome,
    pub record: Option<StopRecord>,
}

impl Transition {
    fn applied(session: TimerSession) -> Self {
        Self {
            session,
            outcome: Outcome::Applied,
            record: None,
        }
    }

    fn ignored(session: TimerSession) -> Self {
        Self {
            session,
            outcome: Outcome::Ignored,
            record: None,
        }
    }
}

/// Apply one event to a session.
pub fn apply(session: TimerSession, event: TimerEvent, now: DateTime<Utc>) -> Transition {
    use TimerSession::{Idle, Paused, Running};

    match (session, event) {
        (
            Idle,
            TimerEvent::Start {
                category_id,
                todo_id,
            },
        ) => Transition::applied(Running {
            category_id,
            todo_id,
            started_at: now,
            last_resumed_at: now,
            accumulated_ms: 0,
        }),

        (
            Running {
                category_id,
                todo_id,
                started_at,
                last_resumed_at,
                accumulated_ms,
            },
            TimerEvent::Pause,
        ) => Transition::applied(Paused {
            category_id,
            todo_id,
            started_at,
            accumulated_ms: accumulated_ms.saturating_add(segment_ms(last_resumed_at, now)),
        }),

        (
            Paused {
                category_id,
                todo_id,
                started_at,
                accumulated_ms,
            },
            TimerEvent::Resume,
        ) => Transition::applied(Running {
            category_id,
            todo_id,
            started_at,
            last_resumed_at: now,
            accumulated_ms,
        }),

        (
            Running {
                category_id,
                todo_id,
                started_at,
                last_resumed_at,
                accumulated_ms,
            },
            TimerEvent::Stop,
        ) => finish(
            category_id,
            todo_id,
            started_at,
            accumulated_ms.saturating_add(segment_ms(last_resumed_at, now)),
            now,
        ),

        (
            Paused {
                category_id,
                todo_id,
                started_at,
                accumulated_ms,
            },
            TimerEvent::Stop,
        ) => finish(category_id, todo_id, started_at, accumulated_ms, now),

        (_, TimerEvent::Reset) => Transition::applied(Idle),

        (mut session @ (Running { .. } | Paused { .. }), TimerEvent::UpdateCategory(id)) => {
            match &mut session {
                Running { category_id, .. } | Paused { category_id, .. } => *category_id = id,
                Idle => {}
            }
            Transition::applied(session)
        }

        (mut session @ (Running { .. } | Paused { .. }), TimerEvent::Adjust { ms }) => {
            match &mut session {
                Running { accumulated_ms, .. } | Paused { accumulated_ms, .. } => {
                    *accumulated_ms = accumulated_ms.saturating_add(ms)
                }
                Idle => {}
            }
            Transition::applied(session)
        }

        (session, _) => Transition::ignored(session),
    }
}

fn finish(
    category_id: String,
    todo_id: Option<String>,
    started_at: DateTime<Utc>,
    elapsed_ms: u64,
    now: DateTime<Utc>,
) -> Transition {
    let duration_minutes =
        round_minutes(i64::try_from(elapsed_ms).unwrap_or(i64::MAX)).max(MIN_LOGGED_MINUTES);

    Transition {
        session: TimerSession::Idle,
        outcome: Outcome::Applied,
        record: Some(StopRecord {
            category_id,
            todo_id,
            duration_minutes,
            elapsed_ms,
            start_time: started_at,
            end_time: now,
        }),
    }
}

/// Flat storage layout of a session. Restorable verbatim across restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTimer {
    pub status: TimerStatus,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub todo_id: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_resumed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub accumulated_ms: u64,
}

impl From<&TimerSession> for PersistedTimer {
    fn from(session: &TimerSession) -> Self {
        Self {
            status: session.status(),
            category_id: session.category_id().map(str::to_string),
            todo_id: session.todo_id().map(str::to_string),
            started_at: session.started_at(),
            last_resumed_at: session.last_resumed_at(),
            accumulated_ms: session.accumulated_ms(),
        }
    }
}

impl From<PersistedTimer> for TimerSession {
    /// Inconsistent records degrade instead of failing: a running record
    /// without `lastResumedAt` is treated as paused, and a record missing its
    /// category or start time is treated as idle.
    fn from(p: PersistedTimer) -> Self {
        let (Some(category_id), Some(started_at)) = (p.category_id, p.started_at) else {
            return TimerSession::Idle;
        };

        match (p.status, p.last_resumed_at) {
            (TimerStatus::Idle, _) => TimerSession::Idle,
            (TimerStatus::Running, Some(last_resumed_at)) => TimerSession::Running {
                category_id,
                todo_id: p.todo_id,
                started_at,
                last_resumed_at,
                accumulated_ms: p.accumulated_ms,
            },
            (TimerStatus::Running, None) | (TimerStatus::Paused, _) => TimerSession::Paused {
                category_id,
                todo_id: p.todo_id,
                started_at,
                accumulated_ms: p.accumulated_ms,
            },
        }
    }
}

/// Save hook for the timer. Implemented over SQLite by `db::kv`.
pub trait TimerStore {
    fn load(&mut self) -> AppResult<Option<PersistedTimer>>;
    fn save(&mut self, record: &PersistedTimer) -> AppResult<()>;
}

/// State of the last save through the [`TimerStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistStatus {
    Idle,
    Syncing,
    Saved,
    Error,
}

/// The timer as the application uses it: pure transitions, a clock and a
/// save-on-transition hook.
pub struct Timer<C: Clock, S: TimerStore> {
    clock: C,
    store: S,
    session: TimerSession,
    persist_status: PersistStatus,
    persist_error: Option<String>,
}

impl<C: Clock, S: TimerStore> Timer<C, S> {
    /// Load the persisted session. A store that fails to load leaves the
    /// timer idle with the error recorded.
    pub fn restore(clock: C, mut store: S) -> Self {
        let (session, persist_status, persist_error) = match store.load() {
            Ok(Some(record)) => (TimerSession::from(record), PersistStatus::Saved, None),
            Ok(None) => (TimerSession::Idle, PersistStatus::Idle, None),
            Err(e) => (TimerSession::Idle, PersistStatus::Error, Some(e.to_string())),
        };

        Self {
            clock,
            store,
            session,
            persist_status,
            persist_error,
        }
    }

    pub fn session(&self) -> &TimerSession {
        &self.session
    }

    pub fn status(&self) -> TimerStatus {
        self.session.status()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.session.elapsed_ms(self.clock.now())
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn persist_status(&self) -> PersistStatus {
        self.persist_status
    }

    pub fn persist_error(&self) -> Option<&str> {
        self.persist_error.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn start(&mut self, category_id: impl Into<String>, todo_id: Option<String>) -> Outcome {
        self.dispatch(TimerEvent::Start {
            category_id: category_id.into(),
            todo_id,
        })
        .0
    }

    pub fn pause(&mut self) -> Outcome {
        self.dispatch(TimerEvent::Pause).0
    }

    pub fn resume(&mut self) -> Outcome {
        self.dispatch(TimerEvent::Resume).0
    }

    /// Finish the session. `None` when the timer was idle.
    pub fn stop(&mut self) -> Option<StopRecord> {
        self.dispatch(TimerEvent::Stop).1
    }

    pub fn reset(&mut self) -> Outcome {
        self.dispatch(TimerEvent::Reset).0
    }

    pub fn update_category(&mut self, category_id: impl Into<String>) -> Outcome {
        self.dispatch(TimerEvent::UpdateCategory(category_id.into())).0
    }

    pub fn adjust(&mut self, ms: u64) -> Outcome {
        self.dispatch(TimerEvent::Adjust { ms }).0
    }

    fn dispatch(&mut self, event: TimerEvent) -> (Outcome, Option<StopRecord>) {
        let now = self.clock.now();
        let current = std::mem::take(&mut self.session);

        let Transition {
            session,
            outcome,
            record,
        } = apply(current, event, now);
        self.session = session;

        if outcome.is_applied() {
            self.persist();
        }

        (outcome, record)
    }

    /// The in-memory session stays authoritative when the save fails.
    fn persist(&mut self) {
        self.persist_status = PersistStatus::Syncing;
        let record = PersistedTimer::from(&self.session);

        match self.store.save(&record) {
            Ok(()) => {
                self.persist_status = PersistStatus::Saved;
                self.persist_error = None;
            }
            Err(e) => {
                self.persist_status = PersistStatus::Error;
                self.persist_error = Some(e.to_string());
            }
        }
    }
}
