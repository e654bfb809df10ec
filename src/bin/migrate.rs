use sea_orm_migration::MigratorTrait;

use cinema_booking_api::{config::AppConfig, db, migrator::Migrator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = db::connect(&config.database_url).await?;
    Migrator::up(&orm, None).await?;
    println!("Migrations applied");
    Ok(())
}
