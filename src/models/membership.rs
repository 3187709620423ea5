use crate::entities::{MembershipStatus, membership_entity as memberships};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMembershipRequest {
    /// 会员本人购买时可省略，管理员代办时必填
    pub user_id: Option<i64>,
    pub package_id: i64,
    /// YYYY-MM-DD，缺省为当天
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MembershipQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// 仅管理员生效
    pub user_id: Option<i64>,
    pub status: Option<MembershipStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipResponse {
    pub id: i64,
    pub user_id: i64,
    pub package_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub remaining_sessions: i32,
    pub status: MembershipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<memberships::Model> for MembershipResponse {
    fn from(m: memberships::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            package_id: m.package_id,
            start_date: m.start_date,
            end_date: m.end_date,
            remaining_sessions: m.remaining_sessions,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
