use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MessageMatchers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MessageMatchers::MatcherId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MessageMatchers::NamespaceId).integer().not_null())
                    .col(ColumnDef::new(MessageMatchers::MatcherName).string_len(100).not_null())
                    .col(ColumnDef::new(MessageMatchers::MatcherType).string_len(20).not_null())
                    .col(ColumnDef::new(MessageMatchers::MatchField).string_len(100).not_null())
                    .col(ColumnDef::new(MessageMatchers::MatchOperator).string_len(20).not_null())
                    .col(ColumnDef::new(MessageMatchers::MatchValue).text().not_null())
                    .col(
                        ColumnDef::new(MessageMatchers::Priority)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(ColumnDef::new(MessageMatchers::Status).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(MessageMatchers::CreateTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(MessageMatchers::UpdateTime)
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
                    .name("idx_message_matchers_namespace_id")
                    .table(MessageMatchers::Table)
                    .col(MessageMatchers::NamespaceId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MessageMatchers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MessageMatchers {
    Table,
    MatcherId,
    NamespaceId,
    MatcherName,
    MatcherType,
    MatchField,
    MatchOperator,
    MatchValue,
    Priority,
    Status,
    CreateTime,
    UpdateTime,
}
