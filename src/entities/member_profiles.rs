use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 会员身体档案
/// - height: 厘米
/// - weight: 千克
/// - bmi: 每次保存时由 height/weight 推导，不接受客户端写入
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "member_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub bmi: Option<f64>,
    pub goal: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// BMI = weight(kg) / height(m)^2，保留两位小数。
/// 身高或体重缺失、身高不为正时返回 None。
pub fn calculate_bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<f64> {
    let (height, weight) = (height_cm?, weight_kg?);
    if height <= 0.0 || weight <= 0.0 {
        return None;
    }
    let height_m = height / 100.0;
    let bmi = weight / (height_m * height_m);
    Some((bmi * 100.0).round() / 100.0)
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let height = self.height.clone().take().flatten();
        let weight = self.weight.clone().take().flatten();
        self.bmi = sea_orm::Set(calculate_bmi(height, weight));
        self.updated_at = sea_orm::Set(Utc::now());
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_bmi() {
        // 70 / 1.75^2 = 22.857...
        assert_eq!(calculate_bmi(Some(175.0), Some(70.0)), Some(22.86));
        assert_eq!(calculate_bmi(Some(160.0), Some(50.0)), Some(19.53));
    }

    #[test]
    fn test_calculate_bmi_missing_or_invalid() {
        assert_eq!(calculate_bmi(None, Some(70.0)), None);
        assert_eq!(calculate_bmi(Some(175.0), None), None);
        assert_eq!(calculate_bmi(Some(0.0), Some(70.0)), None);
        assert_eq!(calculate_bmi(Some(-10.0), Some(70.0)), None);
    }
}
