use super::packages::DurationClass;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "expired")]
    Expired,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl MembershipStatus {
    /// 过期判定：仅 active 会因 end_date 已过而变为 expired，cancelled 保持不变。
    pub fn recompute(self, end_date: NaiveDate, today: NaiveDate) -> Self {
        match self {
            MembershipStatus::Active if end_date < today => MembershipStatus::Expired,
            other => other,
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipStatus::Active => write!(f, "active"),
            MembershipStatus::Expired => write!(f, "expired"),
            MembershipStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// end_date = start_date + 周期天数，仅在创建时计算一次
pub fn compute_end_date(start_date: NaiveDate, duration: DurationClass) -> NaiveDate {
    start_date + Duration::days(duration.duration_days())
}

/// 会员购买的套餐记录
/// - remaining_sessions: 剩余私教课次数，只减不增
/// - status: 每次读写时惰性重算过期
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "memberships")]
pub struct Model {
    #[sea_orm(primary_key)]
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

impl Model {
    pub fn status_on(&self, today: NaiveDate) -> MembershipStatus {
        self.status.recompute(self.end_date, today)
    }

    pub fn has_sessions(&self) -> bool {
        self.remaining_sessions > 0
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::packages::Entity",
        from = "Column::PackageId",
        to = "super::packages::Column::Id",
        on_delete = "Restrict"
    )]
    Package,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::packages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Package.def()
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

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_compute_end_date() {
        let start = date(2024, 1, 1);
        assert_eq!(compute_end_date(start, DurationClass::Monthly), date(2024, 1, 31));
        assert_eq!(compute_end_date(start, DurationClass::Quarterly), date(2024, 3, 31));
        // 2024 为闰年
        assert_eq!(compute_end_date(start, DurationClass::Yearly), date(2024, 12, 31));
    }

    #[test]
    fn test_end_date_spans_exact_days() {
        let start = date(2023, 11, 15);
        for class in [
            DurationClass::Monthly,
            DurationClass::Quarterly,
            DurationClass::Yearly,
        ] {
            let end = compute_end_date(start, class);
            assert_eq!((end - start).num_days(), class.duration_days());
        }
    }

    #[test]
    fn test_recompute_status() {
        let today = date(2024, 6, 1);
        let past = date(2024, 5, 31);
        assert_eq!(
            MembershipStatus::Active.recompute(past, today),
            MembershipStatus::Expired
        );
        // 当天到期仍然有效
        assert_eq!(
            MembershipStatus::Active.recompute(today, today),
            MembershipStatus::Active
        );
        // 已取消的不会被改写
        assert_eq!(
            MembershipStatus::Cancelled.recompute(past, today),
            MembershipStatus::Cancelled
        );
        assert_eq!(
            MembershipStatus::Expired.recompute(date(2030, 1, 1), today),
            MembershipStatus::Expired
        );
    }
}
