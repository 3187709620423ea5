use crate::entities::member_profile_entity as profiles;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpsertMemberProfileRequest {
    /// cm
    pub height: Option<f64>,
    /// kg
    pub weight: Option<f64>,
    pub goal: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberProfileResponse {
    pub id: i64,
    pub user_id: i64,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub bmi: Option<f64>,
    pub goal: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<profiles::Model> for MemberProfileResponse {
    fn from(m: profiles::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            height: m.height,
            weight: m.weight,
            bmi: m.bmi,
            goal: m.goal,
            updated_at: m.updated_at,
        }
    }
}
