use crate::entities::UserRole;
use crate::error::{AppError, AppResult};

/// 当前请求的操作者，由鉴权中间件从访问令牌中解析
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: i64, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_trainer(&self) -> bool {
        self.role == UserRole::Trainer
    }

    pub fn is_member(&self) -> bool {
        self.role == UserRole::Member
    }

    pub fn require_admin(&self, action: &str) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(format!(
                "only admins can {action}"
            )))
        }
    }

    /// 本人或管理员
    pub fn require_self_or_admin(&self, owner_id: i64, what: &str) -> AppResult<()> {
        if self.is_admin() || self.user_id == owner_id {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(what.to_string()))
        }
    }
}
