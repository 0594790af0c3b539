use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn handle(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let manager = DatabaseManager::connect(&config.database).await?;
    let result = manager.migrate().await;
    manager.close().await;
    result?;

    output_success(output_format, "Migrations applied", None)
}
