use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create profiles table
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(pk_auto(Profiles::Id))
                    .col(string(Profiles::Subject).unique_key())
                    .col(string(Profiles::Email).unique_key())
                    .col(string(Profiles::FullName))
                    .to_owned(),
            )
            .await?;

        // Create user_roles table; the unique key on profile_id keeps it to
        // one role binding per profile
        manager
            .create_table(
                Table::create()
                    .table(UserRoles::Table)
                    .if_not_exists()
                    .col(pk_auto(UserRoles::Id))
                    .col(integer(UserRoles::ProfileId).unique_key())
                    .col(string_len(UserRoles::Role, 20))
                    .col(integer_null(UserRoles::GrantedBy))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_profile")
                            .from(UserRoles::Table, UserRoles::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_granted_by")
                            .from(UserRoles::Table, UserRoles::GrantedBy)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create daily_records table
        manager
            .create_table(
                Table::create()
                    .table(DailyRecords::Table)
                    .if_not_exists()
                    .col(pk_auto(DailyRecords::Id))
                    .col(date(DailyRecords::RecordDate).unique_key())
                    .col(integer(DailyRecords::CreatedBy))
                    .col(integer_null(DailyRecords::UpdatedBy))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_daily_records_created_by")
                            .from(DailyRecords::Table, DailyRecords::CreatedBy)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_daily_records_updated_by")
                            .from(DailyRecords::Table, DailyRecords::UpdatedBy)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create driver_entries table
        manager
            .create_table(
                Table::create()
                    .table(DriverEntries::Table)
                    .if_not_exists()
                    .col(pk_auto(DriverEntries::Id))
                    .col(integer(DriverEntries::RecordId))
                    .col(string(DriverEntries::DriverName))
                    .col(integer(DriverEntries::BagsDelivered))
                    .col(decimal(DriverEntries::SalesAmount).decimal_len(16, 4))
                    .col(decimal(DriverEntries::FuelCost).decimal_len(16, 4))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_driver_entries_record")
                            .from(DriverEntries::Table, DriverEntries::RecordId)
                            .to(DailyRecords::Table, DailyRecords::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create expenses table
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(pk_auto(Expenses::Id))
                    .col(integer(Expenses::RecordId))
                    .col(string(Expenses::Description))
                    .col(decimal(Expenses::Amount).decimal_len(16, 4))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_record")
                            .from(Expenses::Table, Expenses::RecordId)
                            .to(DailyRecords::Table, DailyRecords::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create notification_log table
        manager
            .create_table(
                Table::create()
                    .table(NotificationLog::Table)
                    .if_not_exists()
                    .col(pk_auto(NotificationLog::Id))
                    .col(integer(NotificationLog::RecordId))
                    .col(string(NotificationLog::NotificationType))
                    .col(json(NotificationLog::Recipients))
                    .col(integer(NotificationLog::SentBy))
                    .col(date_time(NotificationLog::SentAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_log_record")
                            .from(NotificationLog::Table, NotificationLog::RecordId)
                            .to(DailyRecords::Table, DailyRecords::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_log_sent_by")
                            .from(NotificationLog::Table, NotificationLog::SentBy)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NotificationLog::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(DriverEntries::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(DailyRecords::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UserRoles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    Subject,
    Email,
    FullName,
}

#[derive(DeriveIden)]
enum UserRoles {
    Table,
    Id,
    ProfileId,
    Role,
    GrantedBy,
}

#[derive(DeriveIden)]
enum DailyRecords {
    Table,
    Id,
    RecordDate,
    CreatedBy,
    UpdatedBy,
}

#[derive(DeriveIden)]
enum DriverEntries {
    Table,
    Id,
    RecordId,
    DriverName,
    BagsDelivered,
    SalesAmount,
    FuelCost,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    Id,
    RecordId,
    Description,
    Amount,
}

#[derive(DeriveIden)]
enum NotificationLog {
    Table,
    Id,
    RecordId,
    NotificationType,
    Recipients,
    SentBy,
    SentAt,
}
