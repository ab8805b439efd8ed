use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rules::RuleId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rules::NamespaceId).integer().null())
                    .col(ColumnDef::new(Rules::RuleName).string_len(100).not_null())
                    .col(ColumnDef::new(Rules::RuleType).string_len(50).not_null())
                    .col(ColumnDef::new(Rules::RuleConfig).text().not_null())
                    .col(ColumnDef::new(Rules::Priority).integer().not_null().default(100))
                    .col(ColumnDef::new(Rules::Status).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(Rules::CreateTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Rules::UpdateTime)
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
                    .name("idx_rules_namespace_id")
                    .table(Rules::Table)
                    .col(Rules::NamespaceId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rules::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Rules {
    Table,
    RuleId,
    NamespaceId,
    RuleName,
    RuleType,
    RuleConfig,
    Priority,
    Status,
    CreateTime,
    UpdateTime,
}
