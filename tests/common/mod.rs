#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, Utc};
use gym_backend::entities::{UserRole, package_entity as packages, user_entity as users};
use gym_backend::models::Actor;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use tempfile::TempDir;

/// 单连接的内存 SQLite，跑完整迁移
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// 文件型 SQLite，连接池两个连接，用于并发场景；TempDir 需在测试期间保持存活
pub async fn setup_file_db() -> (TempDir, DatabaseConnection) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("gym.db").display());
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(2)
        .min_connections(2)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    (dir, db)
}

/// 直接写库创建用户，跳过 bcrypt 以加快测试
pub async fn seed_user(db: &DatabaseConnection, username: &str, role: UserRole) -> Actor {
    let user = users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@gym.test")),
        first_name: Set(String::new()),
        last_name: Set(String::new()),
        phone: Set(None),
        role: Set(role),
        password_hash: Set("not-a-real-hash".to_string()),
        is_active: Set(true),
        last_login: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    Actor::new(user.id, role)
}

pub async fn seed_package(
    db: &DatabaseConnection,
    admin: &Actor,
    duration_class: &str,
    trainer_sessions: i32,
) -> packages::Model {
    packages::ActiveModel {
        name: Set(format!("{duration_class} x{trainer_sessions}")),
        price: Set(500_000),
        description: Set(None),
        trainer_sessions: Set(trainer_sessions),
        duration_class: Set(duration_class.to_string()),
        is_active: Set(true),
        created_by: Set(admin.user_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 从现在起第 n 天的一小时时段
pub fn slot(days_from_now: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc::now() + Duration::days(days_from_now);
    (start, start + Duration::hours(1))
}
