//! Latest-query view: tokens for in-flight queries and the state presented to readers.
//!
//! Each query takes a token from `LatestView::begin`. Only the holder of the
//! most recent token can publish; results of superseded queries are dropped.
//! Token issue and publication both happen under the watch channel's lock, so
//! a superseded result can never overwrite a newer state.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Identifies one query; later queries get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct QueryToken(u64);

impl QueryToken {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for QueryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic source of query tokens.
#[derive(Debug, Default)]
pub struct QueryTracker {
    latest: AtomicU64,
}

impl QueryTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Issues a new token, superseding every earlier one.
    pub fn begin(&self) -> QueryToken {
        QueryToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn is_current(&self, token: QueryToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    #[must_use]
    pub fn latest(&self) -> Option<QueryToken> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            n => Some(QueryToken(n)),
        }
    }
}

/// What readers currently see.
///
/// A failure never silently keeps an old result: the previous data, if
/// any, moves to `stale`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState<T> {
    Idle,
    Loading {
        token: QueryToken,
        previous: Option<T>,
    },
    Ready {
        token: QueryToken,
        data: T,
    },
    Failed {
        token: QueryToken,
        reason: String,
        stale: Option<T>,
    },
}

impl<T: Clone> ViewState<T> {
    #[must_use]
    pub fn token(&self) -> Option<QueryToken> {
        match self {
            Self::Idle => None,
            Self::Loading { token, .. }
            | Self::Ready { token, .. }
            | Self::Failed { token, .. } => Some(*token),
        }
    }

    /// Most recent data shown, whether fresh or stale.
    fn last_data(&self) -> Option<T> {
        match self {
            Self::Idle => None,
            Self::Loading { previous, .. } => previous.clone(),
            Self::Ready { data, .. } => Some(data.clone()),
            Self::Failed { stale, .. } => stale.clone(),
        }
    }

    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ready { data, .. } => Some(data),
            _ => None,
        }
    }
}

/// Publishes the outcome of the most recent query only.
pub struct LatestView<T> {
    tracker: QueryTracker,
    tx: watch::Sender<ViewState<T>>,
}

impl<T: Clone + Send + Sync + 'static> Default for LatestView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> LatestView<T> {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ViewState::Idle);
        Self {
            tracker: QueryTracker::new(),
            tx,
        }
    }

    /// Starts a new query and marks the view as loading.
    pub fn begin(&self) -> QueryToken {
        let mut issued = QueryToken(0);
        self.tx.send_modify(|state| {
            issued = self.tracker.begin();
            *state = ViewState::Loading {
                token: issued,
                previous: state.last_data(),
            };
        });
        issued
    }

    #[must_use]
    pub fn is_current(&self, token: QueryToken) -> bool {
        self.tracker.is_current(token)
    }

    /// Publishes fresh data. Returns false if the token was superseded.
    pub fn complete(&self, token: QueryToken, data: T) -> bool {
        self.tx.send_if_modified(|state| {
            if !self.tracker.is_current(token) {
                return false;
            }
            *state = ViewState::Ready { token, data };
            true
        })
    }

    /// Publishes a failure, marking earlier data stale. Returns false if the token was superseded.
    pub fn fail(&self, token: QueryToken, reason: impl Into<String>) -> bool {
        let reason = reason.into();
        self.tx.send_if_modified(|state| {
            if !self.tracker.is_current(token) {
                return false;
            }
            *state = ViewState::Failed {
                token,
                reason,
                stale: state.last_data(),
            };
            true
        })
    }

    #[must_use]
    pub fn current(&self) -> ViewState<T> {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.tx.subscribe()
    }
}
