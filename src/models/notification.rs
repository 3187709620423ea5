use crate::entities::{NotificationType, notification_entity as notifications};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateNotificationRequest {
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub unread_only: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub is_read: bool,
    pub sent_at: DateTime<Utc>,
}

impl From<notifications::Model> for NotificationResponse {
    fn from(m: notifications::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            title: m.title,
            message: m.message,
            notification_type: m.notification_type,
            is_read: m.is_read,
            sent_at: m.sent_at,
        }
    }
}
