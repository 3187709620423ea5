use crate::entities::{UserRole, progress_record_entity as progress};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::user_service::find_user_with_role;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

fn check_range(value: Option<f64>, field: &str, min: f64, max: f64) -> AppResult<()> {
    if let Some(v) = value
        && !(min..=max).contains(&v)
    {
        return Err(AppError::ValidationError(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(())
}

/// 体重 30-150kg，体脂率和肌肉率 0-100%
pub fn validate_measurements(
    weight: Option<f64>,
    body_fat: Option<f64>,
    muscle_mass: Option<f64>,
) -> AppResult<()> {
    check_range(weight, "weight", 30.0, 150.0)?;
    check_range(body_fat, "body_fat", 0.0, 100.0)?;
    check_range(muscle_mass, "muscle_mass", 0.0, 100.0)?;
    Ok(())
}

async fn find_record(pool: &DatabaseConnection, record_id: i64) -> AppResult<progress::Model> {
    progress::Entity::find_by_id(record_id)
        .one(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Progress record {record_id} not found")))
}

#[derive(Clone)]
pub struct ProgressService {
    pool: DatabaseConnection,
}

impl ProgressService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 仅教练可记录，trainer_id 固定为当前教练
    pub async fn create(
        &self,
        actor: &Actor,
        req: CreateProgressRequest,
    ) -> AppResult<ProgressResponse> {
        if !actor.is_trainer() {
            return Err(AppError::PermissionDenied(
                "only trainers can record progress".to_string(),
            ));
        }
        validate_measurements(req.weight, req.body_fat, req.muscle_mass)?;
        find_user_with_role(&self.pool, req.member_id, UserRole::Member).await?;

        let record = progress::ActiveModel {
            member_id: Set(req.member_id),
            trainer_id: Set(Some(actor.user_id)),
            weight: Set(req.weight),
            body_fat: Set(req.body_fat),
            muscle_mass: Set(req.muscle_mass),
            note: Set(req.note),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(record.into())
    }

    /// 仅记录该条数据的教练可修改
    pub async fn update(
        &self,
        actor: &Actor,
        record_id: i64,
        req: UpdateProgressRequest,
    ) -> AppResult<ProgressResponse> {
        let record = find_record(&self.pool, record_id).await?;
        if !actor.is_trainer() || record.trainer_id != Some(actor.user_id) {
            return Err(AppError::PermissionDenied(format!(
                "progress record {record_id} was recorded by another trainer"
            )));
        }
        validate_measurements(req.weight, req.body_fat, req.muscle_mass)?;

        let mut model = record.into_active_model();
        if let Some(weight) = req.weight {
            model.weight = Set(Some(weight));
        }
        if let Some(body_fat) = req.body_fat {
            model.body_fat = Set(Some(body_fat));
        }
        if let Some(muscle_mass) = req.muscle_mass {
            model.muscle_mass = Set(Some(muscle_mass));
        }
        if let Some(note) = req.note {
            model.note = Set(Some(note));
        }
        let updated = model.update(&self.pool).await?;
        Ok(updated.into())
    }

    pub async fn delete(&self, actor: &Actor, record_id: i64) -> AppResult<()> {
        let record = find_record(&self.pool, record_id).await?;
        let allowed = actor.is_admin()
            || (actor.is_trainer() && record.trainer_id == Some(actor.user_id));
        if !allowed {
            return Err(AppError::PermissionDenied(format!(
                "cannot delete progress record {record_id}"
            )));
        }
        record.delete(&self.pool).await?;
        Ok(())
    }

    /// 管理员全部，教练自己记录的，会员关于自己的；按记录时间排序
    pub async fn list(
        &self,
        actor: &Actor,
        query: &ProgressQuery,
    ) -> AppResult<PaginatedResponse<ProgressResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut base = progress::Entity::find();
        base = match actor.role {
            UserRole::Admin => base,
            UserRole::Trainer => base.filter(progress::Column::TrainerId.eq(actor.user_id)),
            UserRole::Member => base.filter(progress::Column::MemberId.eq(actor.user_id)),
        };
        if let Some(member_id) = query.member_id {
            base = base.filter(progress::Column::MemberId.eq(member_id));
        }

        let total = base.clone().count(&self.pool).await?;
        let items = base
            .order_by_asc(progress::Column::RecordedAt)
            .order_by_asc(progress::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(Into::into).collect(),
            &params,
            total,
        ))
    }
}
