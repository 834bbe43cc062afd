//! Transient notifications.
//!
//! A toast leaves the queue either when the shopper dismisses it or when
//! its deadline passes. Both paths go through the same id-keyed removal,
//! so whichever happens first wins and the other finds nothing to remove.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ToastId;

/// How long a toast stays visible unless dismissed.
pub const DEFAULT_TTL_SECONDS: i64 = 3;

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    #[default]
    Success,
    Error,
    Info,
}

impl ToastKind {
    /// CSS modifier / label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: DateTime<Utc>,
}

impl Toast {
    /// Whether the deadline has passed at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Pending toasts, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    #[serde(skip, default = "default_ttl")]
    ttl: Duration,
}

fn default_ttl() -> Duration {
    Duration::seconds(DEFAULT_TTL_SECONDS)
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self {
            toasts: Vec::new(),
            ttl: default_ttl(),
        }
    }
}

impl ToastQueue {
    /// An empty queue with the default lifetime.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different lifetime for toasts pushed from now on.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Queue a toast that expires `ttl` after `now`.
    pub fn push(
        &mut self,
        message: impl Into<String>,
        kind: ToastKind,
        now: DateTime<Utc>,
    ) -> ToastId {
        let id = ToastId::generate();
        self.toasts.push(Toast {
            id: id.clone(),
            message: message.into(),
            kind,
            expires_at: now + self.ttl,
        });
        id
    }

    /// Manual dismissal. Returns `false` if the toast already left the
    /// queue, by timeout or an earlier dismissal.
    pub fn dismiss(&mut self, id: &str) -> bool {
        self.remove_where(|toast| toast.id.as_str() == id) > 0
    }

    /// Drop every toast whose deadline has passed. Returns how many left.
    pub fn expire(&mut self, now: DateTime<Utc>) -> usize {
        self.remove_where(|toast| toast.is_expired(now))
    }

    /// Toasts still visible at `now`.
    pub fn active(&self, now: DateTime<Utc>) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().filter(move |toast| !toast.is_expired(now))
    }

    /// All queued toasts, including expired ones not yet swept.
    #[must_use]
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Whether the queue holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    fn remove_where(&mut self, predicate: impl Fn(&Toast) -> bool) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|toast| !predicate(toast));
        before - self.toasts.len()
    }
}
