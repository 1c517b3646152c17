//! Transient notifications.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default display time in seconds.
pub const DEFAULT_NOTIFICATION_TTL_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A message shown until it expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub message: String,
    pub shown_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

/// Auto-dismissing notification queue.
///
/// Expired entries are pruned on every push and poll, so the queue only
/// holds what is still on screen. The most recent notification is kept
/// apart and survives expiry.
#[derive(Debug)]
pub struct Notifier {
    ttl: Duration,
    items: Vec<Notification>,
    last: Option<Notification>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL_SECS)
    }
}

impl Notifier {
    /// Capped at one day.
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs.min(86_400) as i64),
            items: Vec::new(),
            last: None,
        }
    }

    pub fn push(&mut self, kind: NotificationKind, message: &str, now: NaiveDateTime) -> &Notification {
        match kind {
            NotificationKind::Success => tracing::info!(text = message, "notify"),
            NotificationKind::Error => tracing::warn!(text = message, "notify"),
        }
        self.prune(now);
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            kind,
            message: message.to_string(),
            shown_at: now,
            expires_at: now + self.ttl,
        };
        self.items.push(notification.clone());
        self.last.insert(notification)
    }

    fn prune(&mut self, now: NaiveDateTime) {
        self.items.retain(|n| n.expires_at > now);
    }

    pub fn success(&mut self, message: &str, now: NaiveDateTime) {
        self.push(NotificationKind::Success, message, now);
    }

    pub fn error(&mut self, message: &str, now: NaiveDateTime) {
        self.push(NotificationKind::Error, message, now);
    }

    /// Unexpired notifications, oldest first. Expired ones are dropped.
    pub fn active(&mut self, now: NaiveDateTime) -> Vec<Notification> {
        self.prune(now);
        self.items.clone()
    }

    /// Most recent notification, expired or not.
    pub fn latest(&self) -> Option<&Notification> {
        self.last.as_ref()
    }

    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2026-10-17 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
            + Duration::seconds(secs)
    }

    #[test]
    fn test_expires_after_ttl() {
        let mut notifier = Notifier::default();
        notifier.success("Saved", at(0));

        assert_eq!(notifier.active(at(2)).len(), 1);
        assert!(notifier.active(at(3)).is_empty());
        assert_eq!(notifier.latest().unwrap().message, "Saved");
    }

    #[test]
    fn test_push_prunes_expired_without_polling() {
        let mut notifier = Notifier::new(3);
        for i in 0..1_000 {
            notifier.error(&format!("m{}", i), at(i * 10));
        }

        assert_eq!(notifier.items.len(), 1);
        assert_eq!(notifier.latest().unwrap().message, "m999");
        assert!(notifier.active(at(10_000)).is_empty());
        assert_eq!(notifier.latest().unwrap().message, "m999");
    }

    #[test]
    fn test_dismiss_and_unique_ids() {
        let mut notifier = Notifier::new(10);
        notifier.error("One", at(0));
        notifier.error("Two", at(1));

        let active = notifier.active(at(1));
        assert_ne!(active[0].id, active[1].id);
        assert!(notifier.dismiss(&active[0].id));
        assert!(!notifier.dismiss(&active[0].id));
        assert_eq!(notifier.latest().unwrap().message, "Two");
        assert_eq!(notifier.latest().unwrap().kind, NotificationKind::Error);
    }
}
