use crate::entities::{BookingStatus, booking_entity as bookings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    /// 会员操作时忽略，强制为本人
    pub member_id: Option<i64>,
    /// 教练操作时忽略，强制为本人
    pub trainer_id: Option<i64>,
    pub membership_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub note: Option<String>,
}

/// 修改时间/备注，可同时变更状态；教练与会员套餐关联不可修改
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateBookingRequest {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransitionBookingRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: i64,
    pub member_id: i64,
    pub trainer_id: Option<i64>,
    pub membership_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<bookings::Model> for BookingResponse {
    fn from(m: bookings::Model) -> Self {
        Self {
            id: m.id,
            member_id: m.member_id,
            trainer_id: m.trainer_id,
            membership_id: m.membership_id,
            start_time: m.start_time,
            end_time: m.end_time,
            status: m.status,
            note: m.note,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
