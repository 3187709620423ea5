use crate::config::BootstrapAdminConfig;
use crate::entities::{UserRole, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{hash_password, normalize_phone, validate_password, validate_phone};
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, Set,
};
use std::sync::LazyLock;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]{3,150}$").expect("valid username regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

pub fn validate_username(username: &str) -> AppResult<()> {
    if !USERNAME_RE.is_match(username) {
        return Err(AppError::ValidationError(
            "Username must be 3-150 characters of letters, digits and @/./+/-/_".to_string(),
        ));
    }
    Ok(())
}

/// 空字符串视为未填写
pub fn validate_email(email: &str) -> AppResult<()> {
    if !email.is_empty() && !EMAIL_RE.is_match(email) {
        return Err(AppError::ValidationError("Invalid email address".to_string()));
    }
    Ok(())
}

/// 按ID加载用户，并校验角色
pub async fn find_user_with_role<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    role: UserRole,
) -> AppResult<users::Model> {
    let user = users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
    if user.role != role {
        return Err(AppError::ValidationError(format!(
            "User {user_id} is not a {role}"
        )));
    }
    Ok(user)
}

struct NewUser {
    username: String,
    password: String,
    role: UserRole,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 公开注册，角色固定为 member
    pub async fn register(&self, req: RegisterUserRequest) -> AppResult<UserResponse> {
        let user = self
            .create_user(NewUser {
                username: req.username,
                password: req.password,
                role: UserRole::Member,
                email: req.email,
                first_name: req.first_name,
                last_name: req.last_name,
                phone: req.phone,
            })
            .await?;
        log::info!("Member registered: id={}, username={}", user.id, user.username);
        Ok(user.into())
    }

    /// 管理员创建任意角色的用户
    pub async fn admin_create(
        &self,
        actor: &Actor,
        req: AdminCreateUserRequest,
    ) -> AppResult<UserResponse> {
        actor.require_admin("create users")?;
        let user = self
            .create_user(NewUser {
                username: req.username,
                password: req.password,
                role: req.role,
                email: req.email,
                first_name: req.first_name,
                last_name: req.last_name,
                phone: req.phone,
            })
            .await?;
        log::info!(
            "User created by admin {}: id={}, role={}",
            actor.user_id,
            user.id,
            user.role
        );
        Ok(user.into())
    }

    pub async fn get_current_user(&self, actor: &Actor) -> AppResult<UserResponse> {
        self.get_user(actor, actor.user_id).await
    }

    /// 管理员或本人
    pub async fn get_user(&self, actor: &Actor, user_id: i64) -> AppResult<UserResponse> {
        actor.require_self_or_admin(user_id, "only admins can view other users")?;
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
        Ok(user.into())
    }

    pub async fn update_current_user(
        &self,
        actor: &Actor,
        req: UpdateCurrentUserRequest,
    ) -> AppResult<UserResponse> {
        if req.first_name.is_none()
            && req.last_name.is_none()
            && req.email.is_none()
            && req.phone.is_none()
            && req.password.is_none()
        {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }

        let mut model = users::Entity::find_by_id(actor.user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", actor.user_id)))?
            .into_active_model();

        if let Some(first_name) = req.first_name {
            model.first_name = Set(first_name.trim().to_string());
        }
        if let Some(last_name) = req.last_name {
            model.last_name = Set(last_name.trim().to_string());
        }
        if let Some(email) = req.email {
            let email = email.trim().to_string();
            validate_email(&email)?;
            model.email = Set(email);
        }
        if let Some(phone) = req.phone {
            let phone = self.check_phone(&phone, Some(actor.user_id)).await?;
            model.phone = Set(phone);
        }
        if let Some(password) = req.password {
            validate_password(&password)?;
            model.password_hash = Set(hash_password(&password)?);
        }

        let updated = model.update(&self.pool).await?;
        Ok(updated.into())
    }

    /// 启动时确保管理员账号存在，已存在时不做修改
    pub async fn ensure_admin(&self, admin: &BootstrapAdminConfig) -> AppResult<bool> {
        let exists = users::Entity::find()
            .filter(users::Column::Username.eq(admin.username.as_str()))
            .one(&self.pool)
            .await?;
        if let Some(existing) = exists {
            if existing.role != UserRole::Admin {
                log::warn!(
                    "Bootstrap admin username {} belongs to a {} account",
                    existing.username,
                    existing.role
                );
            }
            return Ok(false);
        }

        let user = self
            .create_user(NewUser {
                username: admin.username.clone(),
                password: admin.password.clone(),
                role: UserRole::Admin,
                email: Some(admin.email.clone()),
                first_name: None,
                last_name: None,
                phone: None,
            })
            .await?;
        log::info!("Bootstrap admin created: id={}", user.id);
        Ok(true)
    }

    async fn create_user(&self, new_user: NewUser) -> AppResult<users::Model> {
        let username = new_user.username.trim().to_string();
        validate_username(&username)?;
        validate_password(&new_user.password)?;
        let email = new_user.email.unwrap_or_default().trim().to_string();
        validate_email(&email)?;
        let phone = match new_user.phone {
            Some(p) => self.check_phone(&p, None).await?,
            None => None,
        };

        let taken = users::Entity::find()
            .filter(users::Column::Username.eq(username.as_str()))
            .count(&self.pool)
            .await?;
        if taken > 0 {
            return Err(AppError::Conflict(format!(
                "Username {username} is already taken"
            )));
        }

        let user = users::ActiveModel {
            username: Set(username),
            email: Set(email),
            first_name: Set(new_user.first_name.unwrap_or_default().trim().to_string()),
            last_name: Set(new_user.last_name.unwrap_or_default().trim().to_string()),
            phone: Set(phone),
            role: Set(new_user.role),
            password_hash: Set(hash_password(&new_user.password)?),
            is_active: Set(true),
            last_login: Set(None),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(user)
    }

    /// 校验并规范化手机号，同时检查唯一性；空字符串表示清除
    async fn check_phone(&self, phone: &str, exclude_user: Option<i64>) -> AppResult<Option<String>> {
        let phone = normalize_phone(phone);
        if phone.is_empty() {
            return Ok(None);
        }
        validate_phone(&phone)?;

        let mut query = users::Entity::find().filter(users::Column::Phone.eq(phone.as_str()));
        if let Some(id) = exclude_user {
            query = query.filter(users::Column::Id.ne(id));
        }
        if query.count(&self.pool).await? > 0 {
            return Err(AppError::Conflict(format!(
                "Phone number {phone} is already registered"
            )));
        }
        Ok(Some(phone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("coach.bob+1@gym").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(151)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("").is_ok());
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
    }
}
