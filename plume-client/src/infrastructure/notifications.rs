//! Toast notifications
//!
//! `NotificationSink` is the fire-and-forget surface the controllers talk
//! to; `ToastManager` is the queue a UI shell renders from.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// User-visible, transient notification channel.
pub trait NotificationSink: Send + Sync {
    fn show(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastNotification {
    pub id: ToastId,
    pub message: String,
    pub level: ToastLevel,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl ToastNotification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.ttl
    }
}

#[derive(Debug)]
struct ToastQueue {
    toasts: VecDeque<ToastNotification>,
    next_id: u64,
}

/// Bounded toast queue; the oldest toast is dropped once `capacity` is hit.
#[derive(Debug)]
pub struct ToastManager {
    queue: Mutex<ToastQueue>,
    ttl: Duration,
    capacity: usize,
}

impl ToastManager {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            queue: Mutex::new(ToastQueue {
                toasts: VecDeque::new(),
                next_id: 1,
            }),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub fn push(&self, message: impl Into<String>, level: ToastLevel) -> ToastId {
        self.push_at(message, level, Instant::now())
    }

    pub fn push_at(
        &self,
        message: impl Into<String>,
        level: ToastLevel,
        now: Instant,
    ) -> ToastId {
        let mut queue = self.queue.lock();
        let id = ToastId(queue.next_id);
        queue.next_id += 1;

        while queue.toasts.len() >= self.capacity {
            queue.toasts.pop_front();
        }
        queue.toasts.push_back(ToastNotification {
            id,
            message: message.into(),
            level,
            created_at: now,
            ttl: self.ttl,
        });
        id
    }

    /// Returns false if the toast was already gone.
    pub fn dismiss(&self, id: ToastId) -> bool {
        let mut queue = self.queue.lock();
        let before = queue.toasts.len();
        queue.toasts.retain(|toast| toast.id != id);
        queue.toasts.len() != before
    }

    /// Drop expired toasts, returning how many were removed.
    pub fn prune_expired(&self, now: Instant) -> usize {
        let mut queue = self.queue.lock();
        let before = queue.toasts.len();
        queue.toasts.retain(|toast| !toast.is_expired(now));
        before - queue.toasts.len()
    }

    /// Toasts still visible at `now`, oldest first.
    pub fn active(&self, now: Instant) -> Vec<ToastNotification> {
        self.queue
            .lock()
            .toasts
            .iter()
            .filter(|toast| !toast.is_expired(now))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for ToastManager {
    fn show(&self, message: &str) {
        self.push(message, ToastLevel::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_toast_is_evicted_at_capacity() {
        let manager = ToastManager::new(Duration::from_secs(4), 2);
        let first = manager.push("one", ToastLevel::Info);
        manager.push("two", ToastLevel::Info);
        manager.push("three", ToastLevel::Info);

        assert_eq!(manager.len(), 2);
        assert!(!manager.dismiss(first));
    }

    #[test]
    fn expired_toasts_are_pruned() {
        let manager = ToastManager::new(Duration::from_millis(100), 5);
        let start = Instant::now();
        manager.push_at("stale", ToastLevel::Warning, start);
        manager.push_at(
            "fresh",
            ToastLevel::Info,
            start + Duration::from_millis(80),
        );

        let later = start + Duration::from_millis(120);
        let active = manager.active(later);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "fresh");

        assert_eq!(manager.prune_expired(later), 1);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn sink_shows_errors() {
        let manager = ToastManager::new(Duration::from_secs(1), 5);
        manager.show("There was an issue");
        let toasts = manager.active(Instant::now());
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].level, ToastLevel::Error);
    }
}
