use crate::entities::progress_record_entity as progress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateProgressRequest {
    pub member_id: i64,
    pub weight: Option<f64>,
    pub body_fat: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub note: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateProgressRequest {
    pub weight: Option<f64>,
    pub body_fat: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub member_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub id: i64,
    pub member_id: i64,
    pub trainer_id: Option<i64>,
    pub weight: Option<f64>,
    pub body_fat: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub note: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<progress::Model> for ProgressResponse {
    fn from(m: progress::Model) -> Self {
        Self {
            id: m.id,
            member_id: m.member_id,
            trainer_id: m.trainer_id,
            weight: m.weight,
            body_fat: m.body_fat,
            muscle_mass: m.muscle_mass,
            note: m.note,
            recorded_at: m.recorded_at,
            updated_at: m.updated_at,
        }
    }
}
