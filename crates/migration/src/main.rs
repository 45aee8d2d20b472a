//! Small CLI to manage the `words` schema outside of the bot.
//!
//! Usage: `migration [up|down|fresh|status] [database-url]`. The url falls
//! back to `DATABASE_URL`, then to a local `vocab.db`.

use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_DATABASE_URL: &str = "sqlite:./vocab.db?mode=rwc";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut args = std::env::args().skip(1);
    let cmd = args.next().unwrap_or_else(|| "up".to_string());

    let db_url = match args.next() {
        Some(url) => url,
        None => std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
    };

    let db = Database::connect(&db_url).await?;

    match cmd.as_str() {
        "up" => migration::Migrator::up(&db, None).await?,
        "down" => migration::Migrator::down(&db, Some(1)).await?,
        "fresh" => migration::Migrator::fresh(&db).await?,
        "status" => migration::Migrator::status(&db).await?,
        _ => {
            eprintln!("Usage: migration [up|down|fresh|status] [database-url]");
            std::process::exit(2);
        }
    }

    Ok(())
}
