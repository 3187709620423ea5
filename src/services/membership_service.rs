use crate::entities::{
    MembershipStatus, UserRole, membership_entity as memberships, memberships::compute_end_date,
    package_entity as packages,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::user_service::find_user_with_role;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// 加载会员套餐并惰性刷新过期状态
pub async fn find_membership<C: ConnectionTrait>(
    db: &C,
    membership_id: i64,
) -> AppResult<memberships::Model> {
    let membership = memberships::Entity::find_by_id(membership_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Membership {membership_id} not found")))?;
    refresh_status(db, membership).await
}

/// active 且 end_date 已过的记录写回 expired，其余原样返回
pub async fn refresh_status<C: ConnectionTrait>(
    db: &C,
    mut membership: memberships::Model,
) -> AppResult<memberships::Model> {
    let next = membership.status_on(today());
    if next == membership.status {
        return Ok(membership);
    }

    memberships::Entity::update_many()
        .col_expr(memberships::Column::Status, Expr::value(next))
        .col_expr(memberships::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(memberships::Column::Id.eq(membership.id))
        .filter(memberships::Column::Status.eq(MembershipStatus::Active))
        .exec(db)
        .await?;
    membership.status = next;
    Ok(membership)
}

/// 原子扣减一次私教课：仅当 remaining_sessions > 0 时生效
pub async fn decrement_session<C: ConnectionTrait>(
    db: &C,
    membership_id: i64,
) -> AppResult<memberships::Model> {
    let result = memberships::Entity::update_many()
        .col_expr(
            memberships::Column::RemainingSessions,
            Expr::col(memberships::Column::RemainingSessions).sub(1),
        )
        .col_expr(memberships::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(memberships::Column::Id.eq(membership_id))
        .filter(memberships::Column::RemainingSessions.gt(0))
        .exec(db)
        .await?;

    // 区分记录不存在和课时用尽
    let membership = find_membership(db, membership_id).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NoSessionsRemaining { membership_id });
    }

    log::info!(
        "Session consumed: membership={}, remaining={}",
        membership_id,
        membership.remaining_sessions
    );
    Ok(membership)
}

#[derive(Clone)]
pub struct MembershipService {
    pool: DatabaseConnection,
}

impl MembershipService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 购买套餐
    /// - 会员只能为自己购买，管理员可为任意会员代办，教练不可操作
    /// - end_date 仅在此处计算一次
    pub async fn create(
        &self,
        actor: &Actor,
        req: CreateMembershipRequest,
    ) -> AppResult<MembershipResponse> {
        let user_id = match actor.role {
            UserRole::Trainer => {
                return Err(AppError::PermissionDenied(
                    "trainers cannot create memberships".to_string(),
                ));
            }
            UserRole::Member => match req.user_id {
                Some(id) if id != actor.user_id => {
                    return Err(AppError::PermissionDenied(
                        "members can only create memberships for themselves".to_string(),
                    ));
                }
                _ => actor.user_id,
            },
            UserRole::Admin => req.user_id.ok_or_else(|| {
                AppError::ValidationError("user_id is required".to_string())
            })?,
        };
        let start_date = req.start_date.unwrap_or_else(today);

        let txn = self.pool.begin().await?;

        find_user_with_role(&txn, user_id, UserRole::Member).await?;

        let package = packages::Entity::find_by_id(req.package_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Package {} not found", req.package_id)))?;
        if !package.is_active {
            return Err(AppError::ValidationError(format!(
                "Package {} is not active",
                package.id
            )));
        }

        let end_date = compute_end_date(start_date, package.duration()?);
        let status = MembershipStatus::Active.recompute(end_date, today());

        let membership = memberships::ActiveModel {
            user_id: Set(user_id),
            package_id: Set(package.id),
            start_date: Set(start_date),
            end_date: Set(end_date),
            remaining_sessions: Set(package.trainer_sessions),
            status: Set(status),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!(
            "Membership created: id={}, user={}, package={}, end_date={}, status={}",
            membership.id,
            user_id,
            package.id,
            end_date,
            status
        );
        Ok(membership.into())
    }

    /// 本人或管理员
    pub async fn get(&self, actor: &Actor, membership_id: i64) -> AppResult<MembershipResponse> {
        let membership = find_membership(&self.pool, membership_id).await?;
        actor.require_self_or_admin(
            membership.user_id,
            &format!("membership {membership_id} belongs to another user"),
        )?;
        Ok(membership.into())
    }

    /// 管理员可查看全部（可按 user_id 过滤），其他人只能看自己的
    pub async fn list(
        &self,
        actor: &Actor,
        query: &MembershipQuery,
    ) -> AppResult<PaginatedResponse<MembershipResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);
        let owner = if actor.is_admin() {
            query.user_id
        } else {
            Some(actor.user_id)
        };

        // 列表读取前先批量刷新过期状态
        self.expire_for(owner).await?;

        let mut base = memberships::Entity::find();
        if let Some(user_id) = owner {
            base = base.filter(memberships::Column::UserId.eq(user_id));
        }
        if let Some(status) = query.status {
            base = base.filter(memberships::Column::Status.eq(status));
        }

        let total = base.clone().count(&self.pool).await?;
        let items = base
            .order_by_desc(memberships::Column::CreatedAt)
            .order_by_desc(memberships::Column::Id)
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

    /// active -> cancelled；重复取消无操作；已过期不可取消
    pub async fn cancel(&self, actor: &Actor, membership_id: i64) -> AppResult<MembershipResponse> {
        let txn = self.pool.begin().await?;
        let membership = find_membership(&txn, membership_id).await?;
        actor.require_self_or_admin(
            membership.user_id,
            &format!("membership {membership_id} belongs to another user"),
        )?;

        let membership = match membership.status {
            MembershipStatus::Cancelled => membership,
            MembershipStatus::Expired => {
                return Err(AppError::ValidationError(format!(
                    "Membership {membership_id} has already expired"
                )));
            }
            MembershipStatus::Active => {
                let result = memberships::Entity::update_many()
                    .col_expr(
                        memberships::Column::Status,
                        Expr::value(MembershipStatus::Cancelled),
                    )
                    .col_expr(memberships::Column::UpdatedAt, Expr::value(Utc::now()))
                    .filter(memberships::Column::Id.eq(membership_id))
                    .filter(memberships::Column::Status.eq(MembershipStatus::Active))
                    .exec(&txn)
                    .await?;
                if result.rows_affected == 0 {
                    return Err(AppError::Conflict(format!(
                        "Membership {membership_id} was modified concurrently"
                    )));
                }
                log::info!("Membership cancelled: id={membership_id}, by={}", actor.user_id);
                find_membership(&txn, membership_id).await?
            }
        };

        txn.commit().await?;
        Ok(membership.into())
    }

    /// 批量将已过期的 active 记录标记为 expired，返回处理条数
    pub async fn expire_memberships(&self) -> AppResult<u64> {
        self.expire_for(None).await
    }

    async fn expire_for(&self, user_id: Option<i64>) -> AppResult<u64> {
        let mut update = memberships::Entity::update_many()
            .col_expr(
                memberships::Column::Status,
                Expr::value(MembershipStatus::Expired),
            )
            .col_expr(memberships::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(memberships::Column::Status.eq(MembershipStatus::Active))
            .filter(memberships::Column::EndDate.lt(today()));
        if let Some(user_id) = user_id {
            update = update.filter(memberships::Column::UserId.eq(user_id));
        }
        let result = update.exec(&self.pool).await?;
        Ok(result.rows_affected)
    }
}
