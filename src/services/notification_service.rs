use crate::entities::{notification_entity as notifications, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

const MAX_TITLE_CHARS: usize = 100;

fn validate_notification(title: &str, message: &str) -> AppResult<()> {
    let len = title.trim().chars().count();
    if len == 0 || len > MAX_TITLE_CHARS {
        return Err(AppError::ValidationError(format!(
            "Title must be 1-{MAX_TITLE_CHARS} characters"
        )));
    }
    if message.trim().is_empty() {
        return Err(AppError::ValidationError("Message is required".to_string()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct NotificationService {
    pool: DatabaseConnection,
}

impl NotificationService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        req: CreateNotificationRequest,
    ) -> AppResult<NotificationResponse> {
        actor.require_admin("send notifications")?;
        validate_notification(&req.title, &req.message)?;

        users::Entity::find_by_id(req.user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", req.user_id)))?;

        let notification = notifications::ActiveModel {
            user_id: Set(req.user_id),
            title: Set(req.title.trim().to_string()),
            message: Set(req.message),
            notification_type: Set(req.notification_type),
            is_read: Set(false),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(notification.into())
    }

    /// 用户查看自己的，管理员查看全部
    pub async fn list(
        &self,
        actor: &Actor,
        query: &NotificationQuery,
    ) -> AppResult<PaginatedResponse<NotificationResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut base = notifications::Entity::find();
        if !actor.is_admin() {
            base = base.filter(notifications::Column::UserId.eq(actor.user_id));
        }
        if query.unread_only.unwrap_or(false) {
            base = base.filter(notifications::Column::IsRead.eq(false));
        }

        let total = base.clone().count(&self.pool).await?;
        let items = base
            .order_by_desc(notifications::Column::SentAt)
            .order_by_desc(notifications::Column::Id)
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

    pub async fn mark_read(
        &self,
        actor: &Actor,
        notification_id: i64,
    ) -> AppResult<NotificationResponse> {
        let notification = self.find_own(actor, notification_id).await?;
        if notification.is_read {
            return Ok(notification.into());
        }
        let mut model = notification.into_active_model();
        model.is_read = Set(true);
        let updated = model.update(&self.pool).await?;
        Ok(updated.into())
    }

    pub async fn delete(&self, actor: &Actor, notification_id: i64) -> AppResult<()> {
        let notification = self.find_own(actor, notification_id).await?;
        notification.delete(&self.pool).await?;
        Ok(())
    }

    /// 非本人的通知按不存在处理
    async fn find_own(&self, actor: &Actor, notification_id: i64) -> AppResult<notifications::Model> {
        notifications::Entity::find_by_id(notification_id)
            .one(&self.pool)
            .await?
            .filter(|n| n.user_id == actor.user_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Notification {notification_id} not found"))
            })
    }
}
