use crate::entities::{BookingStatus, UserRole, booking_entity as bookings};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::membership_service::{decrement_session, find_membership};
use crate::services::user_service::find_user_with_role;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 管理员、被指派的教练或预约的会员本人可查看
pub fn can_view(actor: &Actor, booking: &bookings::Model) -> bool {
    match actor.role {
        UserRole::Admin => true,
        UserRole::Trainer => booking.trainer_id == Some(actor.user_id),
        UserRole::Member => booking.member_id == actor.user_id,
    }
}

/// 状态变更权限:
/// - 管理员: 任意预约
/// - 教练: 仅指派给自己的预约
/// - 会员: 仅自己的预约，且只能改回 pending
pub fn authorize_transition(
    actor: &Actor,
    booking: &bookings::Model,
    next: BookingStatus,
) -> AppResult<()> {
    let allowed = match actor.role {
        UserRole::Admin => true,
        UserRole::Trainer => booking.trainer_id == Some(actor.user_id),
        UserRole::Member => booking.member_id == actor.user_id && next == BookingStatus::Pending,
    };
    if allowed {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(format!(
            "{} {} cannot move booking {} to {}",
            actor.role, actor.user_id, booking.id, next
        )))
    }
}

/// 删除权限：被指派的教练或管理员
pub fn can_delete(actor: &Actor, booking: &bookings::Model) -> bool {
    match actor.role {
        UserRole::Admin => true,
        UserRole::Trainer => booking.trainer_id == Some(actor.user_id),
        UserRole::Member => false,
    }
}

fn validate_time_range(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<()> {
    if start >= end {
        return Err(AppError::ValidationError(
            "start_time must be before end_time".to_string(),
        ));
    }
    Ok(())
}

fn check_transition(booking: &bookings::Model, next: BookingStatus) -> AppResult<()> {
    if booking.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition {
            booking_id: booking.id,
            from: booking.status,
            to: next,
        })
    }
}

async fn find_booking<C: ConnectionTrait>(db: &C, booking_id: i64) -> AppResult<bookings::Model> {
    bookings::Entity::find_by_id(booking_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {booking_id} not found")))
}

/// 以当前状态为条件写入变更（compare-and-set），状态已被他人改动时返回 Conflict。
///
/// 进入 approved 且关联了教练和会员套餐时，在同一事务内扣减一次课时；
/// 余额不足则整个事务回滚。是否"进入"只和库里现存的状态比较，
/// 所以 approved -> pending -> approved 会再扣一次课时，退回 pending 也不返还。
async fn apply_change<C: ConnectionTrait>(
    db: &C,
    booking: &bookings::Model,
    next: BookingStatus,
    mut columns: Vec<(bookings::Column, SimpleExpr)>,
) -> AppResult<bookings::Model> {
    columns.push((bookings::Column::Status, Expr::value(next)));
    columns.push((bookings::Column::UpdatedAt, Expr::value(Utc::now())));

    let mut update = bookings::Entity::update_many();
    for (column, value) in columns {
        update = update.col_expr(column, value);
    }
    let result = update
        .filter(bookings::Column::Id.eq(booking.id))
        .filter(bookings::Column::Status.eq(booking.status))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::Conflict(format!(
            "Booking {} was modified concurrently",
            booking.id
        )));
    }

    let entering_approved = next == BookingStatus::Approved && booking.status != next;
    if entering_approved
        && booking.consumes_session()
        && let Some(membership_id) = booking.membership_id
    {
        decrement_session(db, membership_id).await?;
    }

    if booking.status != next {
        log::info!(
            "Booking {} status changed: {} -> {}",
            booking.id,
            booking.status,
            next
        );
    }
    find_booking(db, booking.id).await
}

#[derive(Clone)]
pub struct BookingService {
    pool: DatabaseConnection,
}

impl BookingService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 创建预约，初始状态总是 pending
    pub async fn create(
        &self,
        actor: &Actor,
        req: CreateBookingRequest,
    ) -> AppResult<BookingResponse> {
        let (member_id, trainer_id) = match actor.role {
            UserRole::Member => (actor.user_id, req.trainer_id),
            UserRole::Trainer => (
                req.member_id.ok_or_else(|| {
                    AppError::ValidationError("member_id is required".to_string())
                })?,
                Some(actor.user_id),
            ),
            UserRole::Admin => (
                req.member_id.ok_or_else(|| {
                    AppError::ValidationError("member_id is required".to_string())
                })?,
                req.trainer_id,
            ),
        };
        validate_time_range(req.start_time, req.end_time)?;

        let txn = self.pool.begin().await?;

        find_user_with_role(&txn, member_id, UserRole::Member).await?;
        if let Some(trainer_id) = trainer_id {
            find_user_with_role(&txn, trainer_id, UserRole::Trainer).await?;
        }
        if let Some(membership_id) = req.membership_id {
            let membership = find_membership(&txn, membership_id).await?;
            if membership.user_id != member_id {
                return Err(AppError::ValidationError(format!(
                    "Membership {membership_id} does not belong to member {member_id}"
                )));
            }
            if trainer_id.is_some() && !membership.has_sessions() {
                return Err(AppError::NoSessionsRemaining { membership_id });
            }
        }

        let booking = bookings::ActiveModel {
            member_id: Set(member_id),
            trainer_id: Set(trainer_id),
            membership_id: Set(req.membership_id),
            start_time: Set(req.start_time),
            end_time: Set(req.end_time),
            status: Set(BookingStatus::Pending),
            note: Set(req.note),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!(
            "Booking created: id={}, member={}, trainer={:?}, membership={:?}",
            booking.id,
            member_id,
            trainer_id,
            booking.membership_id
        );
        Ok(booking.into())
    }

    /// 状态流转：先鉴权，再校验状态机，最后条件写入
    pub async fn transition(
        &self,
        actor: &Actor,
        booking_id: i64,
        next: BookingStatus,
    ) -> AppResult<BookingResponse> {
        // 事务外读取，事务内第一条语句即为条件写入
        let booking = find_booking(&self.pool, booking_id).await?;

        authorize_transition(actor, &booking, next)?;
        check_transition(&booking, next)?;

        // 与当前状态相同：无操作
        if booking.status == next {
            return Ok(booking.into());
        }

        let txn = self.pool.begin().await?;
        let updated = apply_change(&txn, &booking, next, Vec::new()).await?;
        txn.commit().await?;
        Ok(updated.into())
    }

    /// 修改时间/备注，可同时变更状态。
    /// 会员修改后预约回到 pending；教练和管理员未指定状态时保持不变。
    pub async fn update(
        &self,
        actor: &Actor,
        booking_id: i64,
        req: UpdateBookingRequest,
    ) -> AppResult<BookingResponse> {
        let booking = find_booking(&self.pool, booking_id).await?;

        if !can_view(actor, &booking) {
            return Err(AppError::PermissionDenied(format!(
                "booking {booking_id} is not yours to edit"
            )));
        }

        let next = if actor.is_member() {
            match req.status {
                Some(status) if status != BookingStatus::Pending => {
                    return Err(AppError::PermissionDenied(format!(
                        "members can only move booking {booking_id} to pending"
                    )));
                }
                _ => BookingStatus::Pending,
            }
        } else {
            req.status.unwrap_or(booking.status)
        };
        check_transition(&booking, next)?;

        let start_time = req.start_time.unwrap_or(booking.start_time);
        let end_time = req.end_time.unwrap_or(booking.end_time);
        validate_time_range(start_time, end_time)?;

        let mut columns: Vec<(bookings::Column, SimpleExpr)> = Vec::new();
        if let Some(start) = req.start_time {
            columns.push((bookings::Column::StartTime, Expr::value(start)));
        }
        if let Some(end) = req.end_time {
            columns.push((bookings::Column::EndTime, Expr::value(end)));
        }
        if let Some(note) = req.note {
            columns.push((bookings::Column::Note, Expr::value(note)));
        }

        let txn = self.pool.begin().await?;
        let updated = apply_change(&txn, &booking, next, columns).await?;
        txn.commit().await?;
        Ok(updated.into())
    }

    pub async fn get(&self, actor: &Actor, booking_id: i64) -> AppResult<BookingResponse> {
        let booking = find_booking(&self.pool, booking_id).await?;
        if !can_view(actor, &booking) {
            return Err(AppError::PermissionDenied(format!(
                "booking {booking_id} is not visible to you"
            )));
        }
        Ok(booking.into())
    }

    /// 管理员全部、教练被指派的、会员自己的，按开始时间升序
    pub async fn list(
        &self,
        actor: &Actor,
        query: &BookingQuery,
    ) -> AppResult<PaginatedResponse<BookingResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut base = bookings::Entity::find();
        base = match actor.role {
            UserRole::Admin => base,
            UserRole::Trainer => base.filter(bookings::Column::TrainerId.eq(actor.user_id)),
            UserRole::Member => base.filter(bookings::Column::MemberId.eq(actor.user_id)),
        };
        if let Some(status) = query.status {
            base = base.filter(bookings::Column::Status.eq(status));
        }

        let total = base.clone().count(&self.pool).await?;
        let items = base
            .order_by_asc(bookings::Column::StartTime)
            .order_by_asc(bookings::Column::Id)
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

    /// 删除不退还已扣减的课时
    pub async fn delete(&self, actor: &Actor, booking_id: i64) -> AppResult<()> {
        let booking = find_booking(&self.pool, booking_id).await?;
        if !can_delete(actor, &booking) {
            return Err(AppError::PermissionDenied(format!(
                "only the assigned trainer or an admin can delete booking {booking_id}"
            )));
        }
        booking.delete(&self.pool).await?;
        log::info!("Booking deleted: id={booking_id}, by={}", actor.user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(status: BookingStatus) -> bookings::Model {
        let now = Utc::now();
        bookings::Model {
            id: 7,
            member_id: 10,
            trainer_id: Some(20),
            membership_id: Some(30),
            start_time: now,
            end_time: now + chrono::Duration::hours(1),
            status,
            note: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_member_can_only_request_pending() {
        let member = Actor::new(10, UserRole::Member);
        let b = booking(BookingStatus::Approved);
        assert!(authorize_transition(&member, &b, BookingStatus::Pending).is_ok());
        assert!(matches!(
            authorize_transition(&member, &b, BookingStatus::Completed),
            Err(AppError::PermissionDenied(_))
        ));

        let stranger = Actor::new(11, UserRole::Member);
        assert!(authorize_transition(&stranger, &b, BookingStatus::Pending).is_err());
    }

    #[test]
    fn test_trainer_only_assigned_bookings() {
        let b = booking(BookingStatus::Pending);
        let assigned = Actor::new(20, UserRole::Trainer);
        let other = Actor::new(21, UserRole::Trainer);
        assert!(authorize_transition(&assigned, &b, BookingStatus::Approved).is_ok());
        assert!(authorize_transition(&other, &b, BookingStatus::Approved).is_err());
        assert!(can_delete(&assigned, &b));
        assert!(!can_delete(&other, &b));
        assert!(!can_view(&other, &b));
    }

    #[test]
    fn test_admin_and_member_visibility() {
        let b = booking(BookingStatus::Pending);
        assert!(can_view(&Actor::new(1, UserRole::Admin), &b));
        assert!(can_delete(&Actor::new(1, UserRole::Admin), &b));
        assert!(can_view(&Actor::new(10, UserRole::Member), &b));
        // 会员不能删除自己的预约
        assert!(!can_delete(&Actor::new(10, UserRole::Member), &b));
    }

    #[test]
    fn test_check_transition_reports_states() {
        let b = booking(BookingStatus::Completed);
        match check_transition(&b, BookingStatus::Pending) {
            Err(AppError::InvalidTransition { booking_id, from, to }) => {
                assert_eq!(booking_id, 7);
                assert_eq!(from, BookingStatus::Completed);
                assert_eq!(to, BookingStatus::Pending);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_time_range() {
        let now = Utc::now();
        assert!(validate_time_range(now, now + chrono::Duration::minutes(30)).is_ok());
        assert!(validate_time_range(now, now).is_err());
    }
}
