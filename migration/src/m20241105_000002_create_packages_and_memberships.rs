use sea_orm_migration::prelude::*;

use super::m20241105_000001_create_users::Users;

#[derive(DeriveIden)]
pub enum Packages {
    Table,
    Id,
    Name,
    Price,
    Description,
    TrainerSessions,
    DurationClass,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Memberships {
    Table,
    Id,
    UserId,
    PackageId,
    StartDate,
    EndDate,
    RemainingSessions,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 套餐表 + 会员购买记录表
/// - packages.price 以分为单位存储
/// - packages.duration_class: monthly(30天) / quarterly(90天) / yearly(365天)
/// - memberships.package_id 为 RESTRICT 外键，被引用的套餐不可删除
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Packages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Packages::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Packages::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Packages::Price).big_integer().not_null())
                    .col(ColumnDef::new(Packages::Description).text().null())
                    .col(
                        ColumnDef::new(Packages::TrainerSessions)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Packages::TrainerSessions).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Packages::DurationClass)
                            .string_len(16)
                            .not_null()
                            .default("monthly"),
                    )
                    .col(
                        ColumnDef::new(Packages::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Packages::CreatedBy).big_integer().not_null())
                    .col(
                        ColumnDef::new(Packages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Packages::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_packages_created_by")
                            .from(Packages::Table, Packages::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Memberships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Memberships::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Memberships::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Memberships::PackageId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Memberships::StartDate).date().not_null())
                    .col(ColumnDef::new(Memberships::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Memberships::RemainingSessions)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Memberships::RemainingSessions).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Memberships::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Memberships::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Memberships::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_memberships_user")
                            .from(Memberships::Table, Memberships::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_memberships_package")
                            .from(Memberships::Table, Memberships::PackageId)
                            .to(Packages::Table, Packages::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_memberships_user")
                    .table(Memberships::Table)
                    .col(Memberships::UserId)
                    .to_owned(),
            )
            .await?;

        // 过期扫描: status + end_date
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_memberships_status_end_date")
                    .table(Memberships::Table)
                    .col(Memberships::Status)
                    .col(Memberships::EndDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(Memberships::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Packages::Table).to_owned())
            .await?;
        Ok(())
    }
}
