use crate::entities::{DurationClass, membership_entity as memberships, package_entity as packages};
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 100 {
        return Err(AppError::ValidationError(
            "Package name must be 1-100 characters".to_string(),
        ));
    }
    Ok(name.to_string())
}

fn validate_price(price: i64) -> AppResult<()> {
    if price < 0 {
        return Err(AppError::ValidationError(
            "Price must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_trainer_sessions(sessions: i32) -> AppResult<()> {
    if sessions < 0 {
        return Err(AppError::ValidationError(
            "Trainer sessions must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct PackageService {
    pool: DatabaseConnection,
}

impl PackageService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        req: CreatePackageRequest,
    ) -> AppResult<PackageResponse> {
        actor.require_admin("create packages")?;
        let name = validate_name(&req.name)?;
        validate_price(req.price)?;
        validate_trainer_sessions(req.trainer_sessions)?;
        let duration = DurationClass::parse(&req.duration_class)?;

        let package = packages::ActiveModel {
            name: Set(name),
            price: Set(req.price),
            description: Set(req.description),
            trainer_sessions: Set(req.trainer_sessions),
            duration_class: Set(duration.as_str().to_string()),
            is_active: Set(req.is_active.unwrap_or(true)),
            created_by: Set(actor.user_id),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Package created: id={}, duration={}, sessions={}",
            package.id,
            duration,
            package.trainer_sessions
        );
        Ok(package.into())
    }

    /// 非管理员只能看到上架中的套餐
    pub async fn get(&self, actor: &Actor, package_id: i64) -> AppResult<PackageResponse> {
        let package = packages::Entity::find_by_id(package_id)
            .one(&self.pool)
            .await?
            .filter(|p| actor.is_admin() || p.is_active)
            .ok_or_else(|| AppError::NotFound(format!("Package {package_id} not found")))?;
        Ok(package.into())
    }

    pub async fn list(
        &self,
        actor: &Actor,
        query: &PackageQuery,
    ) -> AppResult<PaginatedResponse<PackageResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut base = packages::Entity::find();
        if !actor.is_admin() {
            base = base.filter(packages::Column::IsActive.eq(true));
        }

        let total = base.clone().count(&self.pool).await?;
        let items = base
            .order_by_desc(packages::Column::CreatedAt)
            .order_by_desc(packages::Column::Id)
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

    /// 修改套餐不影响已购买会员的 end_date 和剩余课时
    pub async fn update(
        &self,
        actor: &Actor,
        package_id: i64,
        req: UpdatePackageRequest,
    ) -> AppResult<PackageResponse> {
        actor.require_admin("edit packages")?;

        let mut model = packages::Entity::find_by_id(package_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Package {package_id} not found")))?
            .into_active_model();

        if let Some(name) = &req.name {
            model.name = Set(validate_name(name)?);
        }
        if let Some(price) = req.price {
            validate_price(price)?;
            model.price = Set(price);
        }
        if let Some(description) = req.description {
            model.description = Set(Some(description));
        }
        if let Some(sessions) = req.trainer_sessions {
            validate_trainer_sessions(sessions)?;
            model.trainer_sessions = Set(sessions);
        }
        if let Some(class) = &req.duration_class {
            model.duration_class = Set(DurationClass::parse(class)?.as_str().to_string());
        }
        if let Some(is_active) = req.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model.update(&self.pool).await?;
        Ok(updated.into())
    }

    /// 仍被会员套餐引用时禁止删除
    pub async fn delete(&self, actor: &Actor, package_id: i64) -> AppResult<()> {
        actor.require_admin("delete packages")?;

        let txn = self.pool.begin().await?;
        let package = packages::Entity::find_by_id(package_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Package {package_id} not found")))?;

        let referenced = memberships::Entity::find()
            .filter(memberships::Column::PackageId.eq(package_id))
            .count(&txn)
            .await?;
        if referenced > 0 {
            return Err(AppError::Conflict(format!(
                "Package {package_id} is referenced by {referenced} membership(s)"
            )));
        }

        package.delete(&txn).await?;
        txn.commit().await?;

        log::info!("Package deleted: id={package_id}");
        Ok(())
    }
}
