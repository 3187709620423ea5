use crate::entities::review_entity as reviews;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub trainer_id: Option<i64>,
    pub gym_rating: i32,
    pub trainer_rating: Option<i32>,
    pub comment: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateReviewRequest {
    pub gym_rating: Option<i32>,
    pub trainer_rating: Option<i32>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub member_id: i64,
    pub trainer_id: Option<i64>,
    pub gym_rating: i32,
    pub trainer_rating: Option<i32>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<reviews::Model> for ReviewResponse {
    fn from(m: reviews::Model) -> Self {
        Self {
            id: m.id,
            member_id: m.member_id,
            trainer_id: m.trainer_id,
            gym_rating: m.gym_rating,
            trainer_rating: m.trainer_rating,
            comment: m.comment,
            created_at: m.created_at,
        }
    }
}
