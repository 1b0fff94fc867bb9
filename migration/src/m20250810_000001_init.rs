use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== STORES ==========
        manager
            .create_table(
                Table::create()
                    .table(Stores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stores::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Stores::Name)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== USERS ==========
        // Accounts are provisioned by the upstream gateway; this table only
        // backs identity lookups and technician display names.
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string_len(128).not_null())
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== PDV ITEMS ==========
        manager
            .create_table(
                Table::create()
                    .table(PdvItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PdvItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PdvItems::Name)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== STATUS TYPES ==========
        manager
            .create_table(
                Table::create()
                    .table(StatusTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StatusTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StatusTypes::Name)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(StatusTypes::Color).string_len(32).not_null())
                    .to_owned(),
            )
            .await?;

        // ========== PDVS ==========
        manager
            .create_table(
                Table::create()
                    .table(Pdvs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pdvs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pdvs::Number).string_len(16).not_null())
                    .col(ColumnDef::new(Pdvs::StoreId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pdvs_store")
                            .from(Pdvs::Table, Pdvs::StoreId)
                            .to(Stores::Table, Stores::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pdvs_store_number")
                    .table(Pdvs::Table)
                    .col(Pdvs::StoreId)
                    .col(Pdvs::Number)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ========== STATUS HISTORY ==========
        // Append-only ledger; rows are never updated and only go away when
        // their PDV is cascade-deleted.
        manager
            .create_table(
                Table::create()
                    .table(StatusHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StatusHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StatusHistory::Description).text().not_null())
                    .col(
                        ColumnDef::new(StatusHistory::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StatusHistory::PdvId).integer().not_null())
                    .col(ColumnDef::new(StatusHistory::StatusId).integer().not_null())
                    .col(ColumnDef::new(StatusHistory::TechId).integer())
                    .col(ColumnDef::new(StatusHistory::ItemId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_status_history_pdv")
                            .from(StatusHistory::Table, StatusHistory::PdvId)
                            .to(Pdvs::Table, Pdvs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_status_history_status")
                            .from(StatusHistory::Table, StatusHistory::StatusId)
                            .to(StatusTypes::Table, StatusTypes::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_status_history_tech")
                            .from(StatusHistory::Table, StatusHistory::TechId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_status_history_item")
                            .from(StatusHistory::Table, StatusHistory::ItemId)
                            .to(PdvItems::Table, PdvItems::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();

        // Index for latest-entry lookups per PDV
        db.execute_unprepared(
            "CREATE INDEX idx_status_history_pdv_time ON status_history (pdv_id, timestamp DESC)",
        )
        .await?;

        // ========== PROBLEMS ==========
        manager
            .create_table(
                Table::create()
                    .table(Problems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Problems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Problems::PdvId).integer().not_null())
                    .col(ColumnDef::new(Problems::ItemId).integer())
                    .col(ColumnDef::new(Problems::ReportedByUserId).integer())
                    .col(ColumnDef::new(Problems::AssignedToUserId).integer())
                    .col(ColumnDef::new(Problems::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Problems::Description).text().not_null())
                    .col(
                        ColumnDef::new(Problems::Status)
                            .string_len(20)
                            .not_null()
                            .default("Aberto"),
                    )
                    .col(
                        ColumnDef::new(Problems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Problems::ResolvedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Problems::ResolutionNotes).text())
                    .col(ColumnDef::new(Problems::ResolvedByUserId).integer())
                    .col(ColumnDef::new(Problems::OriginStatusId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_problems_pdv")
                            .from(Problems::Table, Problems::PdvId)
                            .to(Pdvs::Table, Pdvs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_problems_item")
                            .from(Problems::Table, Problems::ItemId)
                            .to(PdvItems::Table, PdvItems::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_problems_reporter")
                            .from(Problems::Table, Problems::ReportedByUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_problems_assignee")
                            .from(Problems::Table, Problems::AssignedToUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_problems_resolver")
                            .from(Problems::Table, Problems::ResolvedByUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_problems_origin_status")
                            .from(Problems::Table, Problems::OriginStatusId)
                            .to(StatusTypes::Table, StatusTypes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for open-problem lookups per PDV
        db.execute_unprepared(
            "CREATE INDEX idx_problems_pdv_status ON problems (pdv_id, status, created_at DESC)",
        )
        .await?;

        // ========== CHECKLISTS ==========
        manager
            .create_table(
                Table::create()
                    .table(Checklists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Checklists::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Checklists::Date).date().not_null())
                    .col(
                        ColumnDef::new(Checklists::Status)
                            .string_len(20)
                            .not_null()
                            .default("in-progress"),
                    )
                    .col(ColumnDef::new(Checklists::PdvChecks).json().not_null())
                    .col(ColumnDef::new(Checklists::StoreId).integer().not_null())
                    .col(ColumnDef::new(Checklists::FinalizedByUserId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_checklists_store")
                            .from(Checklists::Table, Checklists::StoreId)
                            .to(Stores::Table, Stores::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_checklists_finalizer")
                            .from(Checklists::Table, Checklists::FinalizedByUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // One checklist per store per calendar day
        manager
            .create_index(
                Index::create()
                    .name("idx_checklists_store_date")
                    .table(Checklists::Table)
                    .col(Checklists::StoreId)
                    .col(Checklists::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ========== REFERENCE DATA ==========
        // "Ok" and "Sem status" are sentinels the application resolves at
        // startup; the remaining types are the stock palette.
        let statuses = Query::insert()
            .into_table(StatusTypes::Table)
            .columns([StatusTypes::Name, StatusTypes::Color])
            .values_panic(["Ok".into(), "green".into()])
            .values_panic(["Atenção".into(), "orange".into()])
            .values_panic(["Manutenção".into(), "red".into()])
            .values_panic(["Reserva".into(), "gray".into()])
            .values_panic(["Sem status".into(), "gray".into()])
            .to_owned();
        manager.exec_stmt(statuses).await?;

        let items = Query::insert()
            .into_table(PdvItems::Table)
            .columns([PdvItems::Name])
            .values_panic(["Monitor".into()])
            .values_panic(["Teclado".into()])
            .values_panic(["Mouse".into()])
            .values_panic(["Scanner de Mão".into()])
            .values_panic(["Impressora Fiscal".into()])
            .to_owned();
        manager.exec_stmt(items).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order of dependencies
        manager
            .drop_table(Table::drop().table(Checklists::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Problems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(StatusHistory::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Pdvs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(StatusTypes::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(PdvItems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stores::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Stores {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Username,
}

#[derive(DeriveIden)]
enum PdvItems {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum StatusTypes {
    Table,
    Id,
    Name,
    Color,
}

#[derive(DeriveIden)]
enum Pdvs {
    Table,
    Id,
    Number,
    StoreId,
}

#[derive(DeriveIden)]
enum StatusHistory {
    Table,
    Id,
    Description,
    Timestamp,
    PdvId,
    StatusId,
    TechId,
    ItemId,
}

#[derive(DeriveIden)]
enum Problems {
    Table,
    Id,
    PdvId,
    ItemId,
    ReportedByUserId,
    AssignedToUserId,
    Title,
    Description,
    Status,
    CreatedAt,
    ResolvedAt,
    ResolutionNotes,
    ResolvedByUserId,
    OriginStatusId,
}

#[derive(DeriveIden)]
enum Checklists {
    Table,
    Id,
    Date,
    Status,
    PdvChecks,
    StoreId,
    FinalizedByUserId,
}
