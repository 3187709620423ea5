use crate::entities::{PaymentStatus, membership_entity as memberships, payment_entity as payments};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::membership_service::find_membership;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// pending -> completed | failed，其余均为非法
pub fn can_change_status(from: PaymentStatus, to: PaymentStatus) -> bool {
    from == PaymentStatus::Pending && matches!(to, PaymentStatus::Completed | PaymentStatus::Failed)
}

#[derive(Clone)]
pub struct PaymentService {
    pool: DatabaseConnection,
}

impl PaymentService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 会员套餐本人或管理员可登记付款
    pub async fn create(
        &self,
        actor: &Actor,
        req: CreatePaymentRequest,
    ) -> AppResult<PaymentResponse> {
        if req.amount <= 0 {
            return Err(AppError::ValidationError(
                "Amount must be greater than zero".to_string(),
            ));
        }
        let receipt_url = req
            .receipt_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        if let Some(url) = &receipt_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(AppError::ValidationError(
                "receipt_url must be an http(s) URL".to_string(),
            ));
        }

        let membership = find_membership(&self.pool, req.membership_id).await?;
        actor.require_self_or_admin(
            membership.user_id,
            &format!("membership {} belongs to another user", membership.id),
        )?;

        let payment = payments::ActiveModel {
            membership_id: Set(membership.id),
            amount: Set(req.amount),
            method: Set(req.method),
            receipt_url: Set(receipt_url),
            status: Set(PaymentStatus::Pending),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Payment recorded: id={}, membership={}, amount={}",
            payment.id,
            payment.membership_id,
            payment.amount
        );
        Ok(payment.into())
    }

    /// 仅管理员可变更状态
    pub async fn update_status(
        &self,
        actor: &Actor,
        payment_id: i64,
        status: PaymentStatus,
    ) -> AppResult<PaymentResponse> {
        actor.require_admin("change payment status")?;

        let txn = self.pool.begin().await?;
        let payment = payments::Entity::find_by_id(payment_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Payment {payment_id} not found")))?;

        if !can_change_status(payment.status, status) {
            return Err(AppError::ValidationError(format!(
                "Payment {payment_id} cannot move from {} to {status}",
                payment.status
            )));
        }

        let result = payments::Entity::update_many()
            .col_expr(payments::Column::Status, Expr::value(status))
            .col_expr(payments::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(payments::Column::Id.eq(payment_id))
            .filter(payments::Column::Status.eq(payment.status))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "Payment {payment_id} was modified concurrently"
            )));
        }

        let updated = payments::Entity::find_by_id(payment_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Payment {payment_id} not found")))?;
        txn.commit().await?;

        log::info!("Payment {payment_id} status changed to {status}");
        Ok(updated.into())
    }

    /// 管理员全部，会员仅自己套餐下的付款
    pub async fn list(
        &self,
        actor: &Actor,
        query: &PaymentQuery,
    ) -> AppResult<PaginatedResponse<PaymentResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut base = payments::Entity::find();
        if !actor.is_admin() {
            let own_memberships: Vec<i64> = memberships::Entity::find()
                .filter(memberships::Column::UserId.eq(actor.user_id))
                .select_only()
                .column(memberships::Column::Id)
                .into_tuple()
                .all(&self.pool)
                .await?;
            base = base.filter(payments::Column::MembershipId.is_in(own_memberships));
        }
        if let Some(membership_id) = query.membership_id {
            base = base.filter(payments::Column::MembershipId.eq(membership_id));
        }

        let total = base.clone().count(&self.pool).await?;
        let items = base
            .order_by_desc(payments::Column::PaymentDate)
            .order_by_desc(payments::Column::Id)
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
