//! Create trucks table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_warehouses::Warehouses;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trucks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trucks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Trucks::EntrepotId).uuid().not_null())
                    .col(
                        ColumnDef::new(Trucks::Immatriculation)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Trucks::Transporteur).string().not_null())
                    .col(ColumnDef::new(Trucks::Transfert).string().not_null())
                    .col(ColumnDef::new(Trucks::Cooperative).string().not_null())
                    .col(ColumnDef::new(Trucks::Kor).string())
                    .col(ColumnDef::new(Trucks::Th).string())
                    .col(
                        ColumnDef::new(Trucks::Statut)
                            .string()
                            .not_null()
                            .default("Enregistré"),
                    )
                    .col(ColumnDef::new(Trucks::AdvancedStatus).string())
                    .col(
                        ColumnDef::new(Trucks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Trucks::HeureArrivee)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Trucks::RefusedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Trucks::ValidatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Trucks::RenvoyeAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Trucks::FinalAcceptedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Trucks::DechargeAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Trucks::History).json().not_null())
                    .col(ColumnDef::new(Trucks::Products).json())
                    .col(
                        ColumnDef::new(Trucks::UnreadForAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Trucks::UnreadForGerant)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Trucks::Comment).string())
                    .col(
                        ColumnDef::new(Trucks::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trucks_entrepot")
                            .from(Trucks::Table, Trucks::EntrepotId)
                            .to(Warehouses::Table, Warehouses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trucks_entrepot_id")
                    .table(Trucks::Table)
                    .col(Trucks::EntrepotId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trucks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Trucks {
    Table,
    Id,
    EntrepotId,
    Immatriculation,
    Transporteur,
    Transfert,
    Cooperative,
    Kor,
    Th,
    Statut,
    AdvancedStatus,
    CreatedAt,
    HeureArrivee,
    RefusedAt,
    ValidatedAt,
    RenvoyeAt,
    FinalAcceptedAt,
    DechargeAt,
    History,
    Products,
    UnreadForAdmin,
    UnreadForGerant,
    Comment,
    Version,
}
