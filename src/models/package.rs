use crate::entities::package_entity as packages;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePackageRequest {
    pub name: String,
    /// 价格(分)
    pub price: i64,
    pub description: Option<String>,
    #[serde(default)]
    pub trainer_sessions: i32,
    /// monthly | quarterly | yearly
    pub duration_class: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdatePackageRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub trainer_sessions: Option<i32>,
    pub duration_class: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageResponse {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub description: Option<String>,
    pub trainer_sessions: i32,
    pub duration_class: String,
    /// 无法识别的周期为 None
    pub duration_days: Option<i64>,
    pub is_active: bool,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<packages::Model> for PackageResponse {
    fn from(m: packages::Model) -> Self {
        let duration_days = m.duration().ok().map(|d| d.duration_days());
        Self {
            id: m.id,
            name: m.name,
            price: m.price,
            description: m.description,
            trainer_sessions: m.trainer_sessions,
            duration_class: m.duration_class,
            duration_days,
            is_active: m.is_active,
            created_by: m.created_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
