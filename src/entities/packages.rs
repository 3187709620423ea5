use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 套餐计费周期，对应固定天数。
/// 数据库中以字符串存储，读出后再解析，非法取值会得到 `InvalidPackageType`。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DurationClass {
    Monthly,
    Quarterly,
    Yearly,
}

impl DurationClass {
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "monthly" => Ok(DurationClass::Monthly),
            "quarterly" => Ok(DurationClass::Quarterly),
            "yearly" => Ok(DurationClass::Yearly),
            other => Err(AppError::InvalidPackageType(other.to_string())),
        }
    }

    pub fn duration_days(self) -> i64 {
        match self {
            DurationClass::Monthly => 30,
            DurationClass::Quarterly => 90,
            DurationClass::Yearly => 365,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DurationClass::Monthly => "monthly",
            DurationClass::Quarterly => "quarterly",
            DurationClass::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for DurationClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "packages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    /// 价格(分)
    pub price: i64,
    pub description: Option<String>,
    pub trainer_sessions: i32,
    pub duration_class: String,
    pub is_active: bool,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn duration(&self) -> AppResult<DurationClass> {
        DurationClass::parse(&self.duration_class)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id",
        on_delete = "Restrict"
    )]
    Creator,
    #[sea_orm(has_many = "super::memberships::Entity")]
    Memberships,
}

impl Related<super::memberships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        if insert {
            self.created_at = sea_orm::Set(now);
        }
        self.updated_at = sea_orm::Set(now);
        Ok(self)
    }
}
