use std::sync::Arc;

use engine::{OwnerId, SqlWordStore};
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "vocab={level},telegram_bot={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.database).await?;
    tracing::info!("database ready");

    let engine = engine::Engine::builder()
        .owner(OwnerId(settings.telegram.owner_id))
        .store(SqlWordStore::new(db))
        .capture_steps(settings.capture)
        .quiz_settings(settings.quiz)
        .build()?;

    let bot = telegram_bot::Bot::builder()
        .token(&settings.telegram.token)
        .engine(Arc::new(engine))
        .build()?;
    bot.run().await;

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
        Database::Url(url) => url.clone(),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
