use crate::entities::member_profile_entity as profiles;
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

fn validate_measurement(value: Option<f64>, field: &str) -> AppResult<()> {
    if let Some(v) = value
        && (!v.is_finite() || v <= 0.0)
    {
        return Err(AppError::ValidationError(format!(
            "{field} must be a positive number"
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ProfileService {
    pool: DatabaseConnection,
}

impl ProfileService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get_own(&self, actor: &Actor) -> AppResult<MemberProfileResponse> {
        let profile = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(actor.user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Profile for user {} not found", actor.user_id))
            })?;
        Ok(profile.into())
    }

    /// 不存在则创建；未提供的字段保持原值，BMI 在保存时重算
    pub async fn upsert_own(
        &self,
        actor: &Actor,
        req: UpsertMemberProfileRequest,
    ) -> AppResult<MemberProfileResponse> {
        validate_measurement(req.height, "height")?;
        validate_measurement(req.weight, "weight")?;

        let existing = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(actor.user_id))
            .one(&self.pool)
            .await?;

        let saved = match existing {
            Some(profile) => {
                let mut model = profile.into_active_model();
                if let Some(height) = req.height {
                    model.height = Set(Some(height));
                }
                if let Some(weight) = req.weight {
                    model.weight = Set(Some(weight));
                }
                if let Some(goal) = req.goal {
                    model.goal = Set(Some(goal));
                }
                model.update(&self.pool).await?
            }
            None => {
                profiles::ActiveModel {
                    user_id: Set(actor.user_id),
                    height: Set(req.height),
                    weight: Set(req.weight),
                    goal: Set(req.goal),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?
            }
        };
        Ok(saved.into())
    }

    pub async fn list(
        &self,
        actor: &Actor,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<MemberProfileResponse>> {
        actor.require_admin("list member profiles")?;

        let base = profiles::Entity::find();
        let total = base.clone().count(&self.pool).await?;
        let items = base
            .order_by_asc(profiles::Column::UserId)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(Into::into).collect(),
            params,
            total,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_measurement() {
        assert!(validate_measurement(None, "height").is_ok());
        assert!(validate_measurement(Some(172.5), "height").is_ok());
        assert!(validate_measurement(Some(0.0), "height").is_err());
        assert!(validate_measurement(Some(f64::NAN), "weight").is_err());
    }
}
