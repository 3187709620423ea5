use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    /// 用户名密码登录，成功后记录 last_login
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let username = request.username.trim();
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid username or password".to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::AuthError(
                "Invalid username or password".to_string(),
            ));
        }
        if !user.is_active {
            return Err(AppError::AuthError("Account is disabled".to_string()));
        }

        let access_token = self.jwt_service.generate_access_token(user.id, user.role)?;

        let mut model = user.into_active_model();
        model.last_login = Set(Some(Utc::now()));
        let user = model.update(&self.pool).await?;

        log::info!("User logged in: id={}, role={}", user.id, user.role);

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.get_access_token_expires_in(),
            user: user.into(),
        })
    }
}
