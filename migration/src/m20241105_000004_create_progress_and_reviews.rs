use sea_orm_migration::prelude::*;

use super::m20241105_000001_create_users::Users;

#[derive(DeriveIden)]
enum ProgressRecords {
    Table,
    Id,
    MemberId,
    TrainerId,
    Weight,
    BodyFat,
    MuscleMass,
    Note,
    RecordedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    Id,
    MemberId,
    TrainerId,
    GymRating,
    TrainerRating,
    Comment,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProgressRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProgressRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProgressRecords::MemberId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProgressRecords::TrainerId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(ProgressRecords::Weight).double().null())
                    .col(ColumnDef::new(ProgressRecords::BodyFat).double().null())
                    .col(ColumnDef::new(ProgressRecords::MuscleMass).double().null())
                    .col(ColumnDef::new(ProgressRecords::Note).text().null())
                    .col(
                        ColumnDef::new(ProgressRecords::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ProgressRecords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_progress_records_member")
                            .from(ProgressRecords::Table, ProgressRecords::MemberId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_progress_records_trainer")
                            .from(ProgressRecords::Table, ProgressRecords::TrainerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_progress_records_member")
                    .table(ProgressRecords::Table)
                    .col(ProgressRecords::MemberId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reviews::MemberId).big_integer().not_null())
                    .col(ColumnDef::new(Reviews::TrainerId).big_integer().null())
                    .col(
                        ColumnDef::new(Reviews::GymRating)
                            .integer()
                            .not_null()
                            .check(Expr::col(Reviews::GymRating).between(1, 5)),
                    )
                    .col(ColumnDef::new(Reviews::TrainerRating).integer().null())
                    .col(ColumnDef::new(Reviews::Comment).text().null())
                    .col(
                        ColumnDef::new(Reviews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_member")
                            .from(Reviews::Table, Reviews::MemberId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_trainer")
                            .from(Reviews::Table, Reviews::TrainerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Reviews::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(ProgressRecords::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
