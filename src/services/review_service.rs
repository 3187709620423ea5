use crate::entities::{UserRole, review_entity as reviews};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::user_service::find_user_with_role;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

fn validate_rating(rating: i32, field: &str) -> AppResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::ValidationError(format!(
            "{field} must be between 1 and 5"
        )));
    }
    Ok(())
}

/// 教练评分必须伴随教练
pub fn validate_review(
    gym_rating: i32,
    trainer_id: Option<i64>,
    trainer_rating: Option<i32>,
) -> AppResult<()> {
    validate_rating(gym_rating, "gym_rating")?;
    if let Some(rating) = trainer_rating {
        if trainer_id.is_none() {
            return Err(AppError::ValidationError(
                "trainer_rating requires a trainer".to_string(),
            ));
        }
        validate_rating(rating, "trainer_rating")?;
    }
    Ok(())
}

async fn find_review(pool: &DatabaseConnection, review_id: i64) -> AppResult<reviews::Model> {
    reviews::Entity::find_by_id(review_id)
        .one(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Review {review_id} not found")))
}

#[derive(Clone)]
pub struct ReviewService {
    pool: DatabaseConnection,
}

impl ReviewService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create(&self, actor: &Actor, req: CreateReviewRequest) -> AppResult<ReviewResponse> {
        if !actor.is_member() {
            return Err(AppError::PermissionDenied(
                "only members can write reviews".to_string(),
            ));
        }
        validate_review(req.gym_rating, req.trainer_id, req.trainer_rating)?;
        if let Some(trainer_id) = req.trainer_id {
            find_user_with_role(&self.pool, trainer_id, UserRole::Trainer).await?;
        }

        let review = reviews::ActiveModel {
            member_id: Set(actor.user_id),
            trainer_id: Set(req.trainer_id),
            gym_rating: Set(req.gym_rating),
            trainer_rating: Set(req.trainer_rating),
            comment: Set(req.comment),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(review.into())
    }

    /// 仅作者可修改
    pub async fn update(
        &self,
        actor: &Actor,
        review_id: i64,
        req: UpdateReviewRequest,
    ) -> AppResult<ReviewResponse> {
        let review = find_review(&self.pool, review_id).await?;
        if review.member_id != actor.user_id {
            return Err(AppError::PermissionDenied(format!(
                "review {review_id} was written by another member"
            )));
        }

        let gym_rating = req.gym_rating.unwrap_or(review.gym_rating);
        let trainer_rating = req.trainer_rating.or(review.trainer_rating);
        validate_review(gym_rating, review.trainer_id, trainer_rating)?;

        let mut model = review.into_active_model();
        model.gym_rating = Set(gym_rating);
        model.trainer_rating = Set(trainer_rating);
        if let Some(comment) = req.comment {
            model.comment = Set(Some(comment));
        }
        let updated = model.update(&self.pool).await?;
        Ok(updated.into())
    }

    pub async fn delete(&self, actor: &Actor, review_id: i64) -> AppResult<()> {
        let review = find_review(&self.pool, review_id).await?;
        actor.require_self_or_admin(
            review.member_id,
            &format!("review {review_id} was written by another member"),
        )?;
        review.delete(&self.pool).await?;
        Ok(())
    }

    /// 管理员全部，教练关于自己的，会员自己写的
    pub async fn list(
        &self,
        actor: &Actor,
        query: &ReviewQuery,
    ) -> AppResult<PaginatedResponse<ReviewResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let base = match actor.role {
            UserRole::Admin => reviews::Entity::find(),
            UserRole::Trainer => {
                reviews::Entity::find().filter(reviews::Column::TrainerId.eq(actor.user_id))
            }
            UserRole::Member => {
                reviews::Entity::find().filter(reviews::Column::MemberId.eq(actor.user_id))
            }
        };

        let total = base.clone().count(&self.pool).await?;
        let items = base
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_review() {
        assert!(validate_review(5, None, None).is_ok());
        assert!(validate_review(3, Some(2), Some(4)).is_ok());
        assert!(validate_review(0, None, None).is_err());
        assert!(validate_review(6, None, None).is_err());
        assert!(validate_review(4, Some(2), Some(9)).is_err());
    }

    #[test]
    fn test_trainer_rating_requires_trainer() {
        assert!(matches!(
            validate_review(4, None, Some(5)),
            Err(AppError::ValidationError(_))
        ));
    }
}
