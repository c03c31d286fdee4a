//! Migration CLI tool.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("info,sea_orm_migration=info")
        .init();

    tracing::info!(
        migrations = migration::Migrator::migrations().len(),
        "Running migration CLI"
    );
    cli::run_cli(migration::Migrator).await;
}
