use sea_orm_migration::prelude::*;

/// Reads `DATABASE_URL` (or `--database-url`) and applies the requested
/// subcommand; `up` with no argument applies every pending migration.
#[async_std::main]
async fn main() {
    cli::run_cli(migration::Migrator).await;
}
