//! Notification repository (notifications.json)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LedgerResult;
use crate::models::{Notification, NotificationId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::table::Table;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct NotificationData {
    #[serde(default)]
    notifications: Vec<Notification>,
}

pub struct NotificationRepository {
    path: PathBuf,
    notifications: Table<NotificationId, Notification>,
}

impl NotificationRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            notifications: Table::new(),
        }
    }

    pub fn load(&self) -> LedgerResult<()> {
        let file_data: NotificationData = read_json(&self.path)?;
        debug!(count = file_data.notifications.len(), "loaded notifications");
        self.notifications
            .replace_all(file_data.notifications, |n| n.id)
    }

    pub fn save(&self) -> LedgerResult<()> {
        let mut notifications = self.notifications.all()?;
        notifications.sort_by_key(|n| n.created_at);
        write_json_atomic(&self.path, &NotificationData { notifications })
    }

    pub fn get(&self, id: NotificationId) -> LedgerResult<Option<Notification>> {
        self.notifications.get(id)
    }

    pub fn upsert(&self, notification: Notification) -> LedgerResult<()> {
        self.notifications.upsert(notification.id, notification)?;
        Ok(())
    }

    /// A user's notifications, newest first
    pub fn for_user(&self, user_id: UserId) -> LedgerResult<Vec<Notification>> {
        let mut notifications = self
            .notifications
            .filter(|n| n.payload.user_id == user_id)?;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    pub fn unread_count(&self, user_id: UserId) -> LedgerResult<usize> {
        Ok(self
            .notifications
            .filter(|n| n.payload.user_id == user_id && !n.is_read)?
            .len())
    }
}
