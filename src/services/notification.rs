//! Notification dispatch and the per-user inbox
//!
//! Services hand notification payloads to a `Notifier`. The stored notifier
//! writes them to the user's inbox; `DedupNotifier` can wrap any notifier to
//! drop payloads that were already sent during this process.

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::{debug, info};

use crate::audit::EntityType;
use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Notification, NotificationId, NotificationPayload, NotificationType, RelatedEntity, UserId,
};
use crate::storage::Storage;

/// Something that delivers notification payloads
pub trait Notifier {
    fn dispatch(&self, payload: &NotificationPayload) -> LedgerResult<()>;
}

/// Dispatch every payload, returning how many were handed over
pub fn dispatch_all(
    notifier: &dyn Notifier,
    payloads: &[NotificationPayload],
) -> LedgerResult<usize> {
    for payload in payloads {
        notifier.dispatch(payload)?;
    }
    Ok(payloads.len())
}

/// Persists each payload as an unread notification
pub struct StoredNotifier<'a> {
    storage: &'a Storage,
}

impl<'a> StoredNotifier<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }
}

impl Notifier for StoredNotifier<'_> {
    fn dispatch(&self, payload: &NotificationPayload) -> LedgerResult<()> {
        let notification = Notification::new(payload.clone());
        self.storage.notifications.upsert(notification.clone())?;
        self.storage.notifications.save()?;
        debug!(
            user = %payload.user_id,
            kind = %payload.notification_type,
            related = %payload.related,
            "stored notification"
        );
        Ok(())
    }
}

type DedupKey = (UserId, RelatedEntity, NotificationType, String);

/// Drops a payload whose (user, related entity, type, title) was already
/// dispatched by this instance
pub struct DedupNotifier<N> {
    inner: N,
    seen: Mutex<HashSet<DedupKey>>,
}

impl<N: Notifier> DedupNotifier<N> {
    pub fn new(inner: N) -> Self {
        Self {
            inner,
            seen: Mutex::new(HashSet::new()),
        }
    }
}

impl<N: Notifier> Notifier for DedupNotifier<N> {
    fn dispatch(&self, payload: &NotificationPayload) -> LedgerResult<()> {
        let key = (
            payload.user_id,
            payload.related,
            payload.notification_type,
            payload.title.clone(),
        );

        let first_time = self
            .seen
            .lock()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire dedup lock: {}", e)))?
            .insert(key);

        if !first_time {
            debug!(user = %payload.user_id, related = %payload.related, "suppressed duplicate notification");
            return Ok(());
        }
        self.inner.dispatch(payload)
    }
}

/// The notifier a process should use given its settings
pub fn notifier_for<'a>(storage: &'a Storage, settings: &Settings) -> Box<dyn Notifier + 'a> {
    let stored = StoredNotifier::new(storage);
    if settings.notifications.deduplicate {
        Box::new(DedupNotifier::new(stored))
    } else {
        Box::new(stored)
    }
}

/// Reading and acknowledging a user's notifications
pub struct NotificationService<'a> {
    storage: &'a Storage,
}

impl<'a> NotificationService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// A user's notifications, newest first
    pub fn list(&self, user_id: UserId, unread_only: bool) -> LedgerResult<Vec<Notification>> {
        let mut notifications = self.storage.notifications.for_user(user_id)?;
        if unread_only {
            notifications.retain(|n| !n.is_read);
        }
        Ok(notifications)
    }

    pub fn unread_count(&self, user_id: UserId) -> LedgerResult<usize> {
        self.storage.notifications.unread_count(user_id)
    }

    /// Mark one notification read; only its recipient may do so
    pub fn mark_read(&self, user_id: UserId, id: NotificationId) -> LedgerResult<Notification> {
        let before = self
            .storage
            .notifications
            .get(id)?
            .ok_or_else(|| LedgerError::NotFound {
                entity_type: "Notification",
                identifier: id.to_string(),
            })?;

        if before.payload.user_id != user_id {
            return Err(LedgerError::Forbidden(
                "notification belongs to another user".into(),
            ));
        }

        let mut notification = before.clone();
        notification.mark_read();
        self.storage.notifications.upsert(notification.clone())?;
        self.storage.notifications.save()?;

        self.storage.log_update(
            EntityType::Notification,
            notification.id.to_string(),
            Some(notification.payload.title.clone()),
            &before,
            &notification,
        )?;
        info!(notification = %id, "marked notification read");

        Ok(notification)
    }

    /// Find one of a user's notifications by short or full ID
    pub fn find(&self, user_id: UserId, identifier: &str) -> LedgerResult<Option<Notification>> {
        let needle = identifier.trim().to_lowercase();
        let notifications = self.storage.notifications.for_user(user_id)?;
        if let Some(found) = notifications.iter().find(|n| n.id.to_string() == needle) {
            return Ok(Some(found.clone()));
        }
        match identifier.parse::<NotificationId>() {
            Ok(id) => Ok(notifications.into_iter().find(|n| n.id == id)),
            Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{BudgetId, HouseholdId};
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Collects payloads in memory
    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        pub sent: RefCell<Vec<NotificationPayload>>,
    }

    impl Notifier for RecordingNotifier {
        fn dispatch(&self, payload: &NotificationPayload) -> LedgerResult<()> {
            self.sent.borrow_mut().push(payload.clone());
            Ok(())
        }
    }

    fn payload(user_id: UserId, related: RelatedEntity) -> NotificationPayload {
        NotificationPayload {
            household_id: HouseholdId::new(),
            user_id,
            title: "Budget warning".into(),
            message: "Budget is at $85.00 of $100.00 (above 80%).".into(),
            notification_type: NotificationType::BudgetWarning,
            related,
        }
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_dedup_drops_repeats_only() {
        let user = UserId::new();
        let budget = RelatedEntity::Budget(BudgetId::new());
        let notifier = DedupNotifier::new(RecordingNotifier::default());

        notifier.dispatch(&payload(user, budget)).unwrap();
        notifier.dispatch(&payload(user, budget)).unwrap();
        notifier.dispatch(&payload(UserId::new(), budget)).unwrap();

        let mut critical = payload(user, budget);
        critical.notification_type = NotificationType::BudgetCritical;
        critical.title = "Budget exceeded".into();
        notifier.dispatch(&critical).unwrap();

        assert_eq!(notifier.inner.sent.borrow().len(), 3);
    }

    #[test]
    fn test_stored_notifier_and_inbox() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserId::new();
        let notifier = StoredNotifier::new(&storage);

        let first = payload(user, RelatedEntity::Budget(BudgetId::new()));
        dispatch_all(&notifier, &[first.clone(), first]).unwrap();
        notifier
            .dispatch(&payload(UserId::new(), RelatedEntity::Budget(BudgetId::new())))
            .unwrap();

        let service = NotificationService::new(&storage);
        let inbox = service.list(user, false).unwrap();
        assert_eq!(inbox.len(), 2);
        assert!(inbox[0].created_at >= inbox[1].created_at);
        assert_eq!(service.unread_count(user).unwrap(), 2);

        let read = service.mark_read(user, inbox[0].id).unwrap();
        assert!(read.is_read);
        assert!(read.read_at.is_some());
        assert_eq!(service.list(user, true).unwrap().len(), 1);
    }

    #[test]
    fn test_mark_read_checks_owner() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = UserId::new();
        StoredNotifier::new(&storage)
            .dispatch(&payload(owner, RelatedEntity::Budget(BudgetId::new())))
            .unwrap();

        let service = NotificationService::new(&storage);
        let id = service.list(owner, false).unwrap()[0].id;

        assert!(service.mark_read(UserId::new(), id).unwrap_err().is_forbidden());
        assert!(service
            .mark_read(owner, NotificationId::new())
            .unwrap_err()
            .is_not_found());
    }
}
