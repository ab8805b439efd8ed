use sea_orm_migration::prelude::*;

mod m20240301_000001_create_namespaces_table;
mod m20240301_000002_create_rules_table;
mod m20240301_000003_create_message_matchers_table;
mod m20240301_000004_create_upstream_servers_table;
mod m20240301_000005_create_location_rules_table;

/// Database migrator for SeaORM
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_namespaces_table::Migration),
            Box::new(m20240301_000002_create_rules_table::Migration),
            Box::new(m20240301_000003_create_message_matchers_table::Migration),
            Box::new(m20240301_000004_create_upstream_servers_table::Migration),
            Box::new(m20240301_000005_create_location_rules_table::Migration),
        ]
    }
}
