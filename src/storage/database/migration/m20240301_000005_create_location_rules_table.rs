use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LocationRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LocationRules::LocationId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LocationRules::Path).string_len(500).not_null())
                    .col(ColumnDef::new(LocationRules::UpstreamId).integer().not_null())
                    .col(ColumnDef::new(LocationRules::ProxyCache).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(LocationRules::ProxyBuffering)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(LocationRules::ProxyPass).string_len(500).null())
                    .col(ColumnDef::new(LocationRules::IsRegex).boolean().not_null().default(false))
                    .col(ColumnDef::new(LocationRules::LimitReqConfig).text().null())
                    .col(ColumnDef::new(LocationRules::SseSupport).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(LocationRules::ChunkedTransfer)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(LocationRules::MatcherType)
                            .string_len(20)
                            .not_null()
                            .default("path"),
                    )
                    .col(ColumnDef::new(LocationRules::MatchField).string_len(100).null())
                    .col(ColumnDef::new(LocationRules::MatchOperator).string_len(20).null())
                    .col(ColumnDef::new(LocationRules::MatchValue).text().null())
                    .col(ColumnDef::new(LocationRules::AddHeaders).text().null())
                    .col(ColumnDef::new(LocationRules::RewritePath).string_len(200).null())
                    .col(ColumnDef::new(LocationRules::Priority).integer().not_null().default(100))
                    .col(ColumnDef::new(LocationRules::Status).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(LocationRules::CreateTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(LocationRules::UpdateTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_location_rules_upstream_id")
                    .table(LocationRules::Table)
                    .col(LocationRules::UpstreamId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LocationRules::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LocationRules {
    Table,
    LocationId,
    Path,
    UpstreamId,
    ProxyCache,
    ProxyBuffering,
    ProxyPass,
    IsRegex,
    LimitReqConfig,
    SseSupport,
    ChunkedTransfer,
    MatcherType,
    MatchField,
    MatchOperator,
    MatchValue,
    AddHeaders,
    RewritePath,
    Priority,
    Status,
    CreateTime,
    UpdateTime,
}
