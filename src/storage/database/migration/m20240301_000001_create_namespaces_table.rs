use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Namespaces::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Namespaces::NamespaceId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Namespaces::NamespaceCode)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Namespaces::NamespaceName).string_len(100).not_null())
                    .col(ColumnDef::new(Namespaces::Description).text().null())
                    .col(ColumnDef::new(Namespaces::Status).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(Namespaces::CreateTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Namespaces::UpdateTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Namespaces::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Namespaces {
    Table,
    NamespaceId,
    NamespaceCode,
    NamespaceName,
    Description,
    Status,
    CreateTime,
    UpdateTime,
}
