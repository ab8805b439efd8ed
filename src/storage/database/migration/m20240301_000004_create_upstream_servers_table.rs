use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UpstreamServers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UpstreamServers::ServerId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UpstreamServers::ServerName).string_len(100).not_null())
                    .col(ColumnDef::new(UpstreamServers::ServerType).string_len(50).not_null())
                    .col(ColumnDef::new(UpstreamServers::ServerUrl).string_len(500).not_null())
                    .col(ColumnDef::new(UpstreamServers::ApiKey).string_len(500).null())
                    .col(ColumnDef::new(UpstreamServers::ModelConfig).text().null())
                    .col(
                        ColumnDef::new(UpstreamServers::LoadBalanceWeight)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(UpstreamServers::MaxConnections)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(UpstreamServers::TimeoutConnect)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(
                        ColumnDef::new(UpstreamServers::TimeoutRead)
                            .integer()
                            .not_null()
                            .default(300),
                    )
                    .col(
                        ColumnDef::new(UpstreamServers::TimeoutWrite)
                            .integer()
                            .not_null()
                            .default(300),
                    )
                    .col(ColumnDef::new(UpstreamServers::HealthCheckUrl).string_len(500).null())
                    .col(
                        ColumnDef::new(UpstreamServers::HealthCheckInterval)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(ColumnDef::new(UpstreamServers::Status).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(UpstreamServers::CreateTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UpstreamServers::UpdateTime)
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
            .drop_table(Table::drop().table(UpstreamServers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UpstreamServers {
    Table,
    ServerId,
    ServerName,
    ServerType,
    ServerUrl,
    ApiKey,
    ModelConfig,
    LoadBalanceWeight,
    MaxConnections,
    TimeoutConnect,
    TimeoutRead,
    TimeoutWrite,
    HealthCheckUrl,
    HealthCheckInterval,
    Status,
    CreateTime,
    UpdateTime,
}
