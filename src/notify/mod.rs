//! Notification feed.
//!
//! The feed caches notifications for display and refreshes from the
//! store. Refreshes are generation-counted: each refresh takes a token
//! when it starts, and a completed refresh is applied only if no newer
//! refresh has started since. A slow, stale response can therefore never
//! overwrite fresher data.

use crate::error::Result;
use crate::model::Notification;
use crate::store::SqliteStore;
use tracing::debug;

/// Token identifying one in-flight refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshToken(u64);

/// Cached view of the notification feed.
#[derive(Debug, Default)]
pub struct NotificationFeed {
    notifications: Vec<Notification>,
    unread: i64,
    generation: u64,
    applied_generation: u64,
}

impl NotificationFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications as of the last applied refresh, newest first.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Unread count as of the last applied refresh.
    #[must_use]
    pub const fn unread(&self) -> i64 {
        self.unread
    }

    /// Start a refresh, returning its token. Starting a new refresh
    /// stales every token issued before it.
    pub fn begin_refresh(&mut self) -> RefreshToken {
        self.generation += 1;
        RefreshToken(self.generation)
    }

    /// Apply fetched data. Returns false (and changes nothing) when a
    /// newer refresh has started since `token` was issued.
    pub fn complete_refresh(
        &mut self,
        token: RefreshToken,
        notifications: Vec<Notification>,
        unread: i64,
    ) -> bool {
        if token.0 < self.generation {
            debug!(
                stale = token.0,
                current = self.generation,
                "discarding stale notification refresh"
            );
            return false;
        }
        self.notifications = notifications;
        self.unread = unread;
        self.applied_generation = token.0;
        true
    }

    /// Fetch-and-apply in one step, the normal synchronous path.
    ///
    /// # Errors
    ///
    /// Returns an error if the store queries fail; the cached feed is
    /// left untouched.
    pub fn refresh(&mut self, store: &SqliteStore) -> Result<()> {
        let token = self.begin_refresh();
        let notifications = store.list_notifications()?;
        let unread = store.unread_count()?;
        self.complete_refresh(token, notifications, unread);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use chrono::Utc;

    fn notification(id: i64) -> Notification {
        Notification {
            id,
            bug_id: 1,
            old_status: Status::Open,
            new_status: Status::Resolved,
            read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn refresh_applies_in_order() {
        let mut feed = NotificationFeed::new();
        let token = feed.begin_refresh();
        assert!(feed.complete_refresh(token, vec![notification(1)], 1));
        assert_eq!(feed.notifications().len(), 1);
        assert_eq!(feed.unread(), 1);
    }

    #[test]
    fn stale_refresh_is_discarded() {
        let mut feed = NotificationFeed::new();
        let stale = feed.begin_refresh();
        let fresh = feed.begin_refresh();

        // The newer refresh lands first.
        assert!(feed.complete_refresh(fresh, vec![notification(2)], 1));

        // The older one arrives late and must not overwrite.
        assert!(!feed.complete_refresh(stale, vec![notification(1)], 5));
        assert_eq!(feed.notifications()[0].id, 2);
        assert_eq!(feed.unread(), 1);
    }

    #[test]
    fn overlapping_refreshes_latest_wins() {
        let mut feed = NotificationFeed::new();
        let first = feed.begin_refresh();
        let second = feed.begin_refresh();
        let third = feed.begin_refresh();

        assert!(!feed.complete_refresh(first, vec![notification(1)], 1));
        assert!(feed.complete_refresh(third, vec![notification(3)], 3));
        assert!(!feed.complete_refresh(second, vec![notification(2)], 2));

        assert_eq!(feed.notifications()[0].id, 3);
        assert_eq!(feed.unread(), 3);
    }

    #[test]
    fn refresh_from_store() {
        use crate::store::{BugDraft, BugUpdate};

        let mut store = SqliteStore::open_memory().unwrap();
        store
            .create_user(&crate::model::User {
                id: 0,
                first_name: "A".to_string(),
                last_name: "B".to_string(),
                email: "a@example.com".to_string(),
                role: None,
                active: true,
            })
            .unwrap();
        store
            .create_project(&crate::model::Project {
                id: 0,
                name: "P".to_string(),
                description: None,
                lead_id: None,
                status: Default::default(),
                team_member_ids: vec![],
                default_priority: Default::default(),
                environments: vec![],
                created_at: None,
            })
            .unwrap();
        let bug = store
            .create_bug(&BugDraft {
                title: "Bug".to_string(),
                reporter_id: 1,
                project_id: 1,
                ..Default::default()
            })
            .unwrap();
        store
            .update_bug(
                bug.id,
                &BugUpdate {
                    status: Some(Status::InProgress),
                    ..Default::default()
                },
            )
            .unwrap();

        let mut feed = NotificationFeed::new();
        feed.refresh(&store).unwrap();
        assert_eq!(feed.notifications().len(), 1);
        assert_eq!(feed.unread(), 1);
    }
}
