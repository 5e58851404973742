use std::time::Duration;

use anyhow::{Context, Result};
use mongodb::bson::doc;
use mongodb::{Client, Database, options::ClientOptions};
use tracing::info;

use crate::config::DatabaseSettings;

pub const FALLBACK_DATABASE: &str = "healthypay";

/// Connect, resolve the target database and confirm it answers a ping.
pub async fn connect_to_mongo(settings: &DatabaseSettings) -> Result<Database> {
    let mut client_options = ClientOptions::parse(&settings.mongo_uri)
        .await
        .context("invalid MongoDB URI")?;
    let timeout = Duration::from_secs(settings.connect_timeout_secs);
    client_options.connect_timeout = Some(timeout);
    client_options.server_selection_timeout = Some(timeout);
    client_options.app_name = Some("healthypay-seeder".to_owned());

    let name = database_name(&client_options, settings.database.as_deref());
    info!(hosts = ?client_options.hosts, database = %name, "connecting to MongoDB");

    let client = Client::with_options(client_options).context("failed to connect to MongoDB")?;
    let db = client.database(&name);

    db.run_command(doc! { "ping": 1 }, None)
        .await
        .context("failed to ping MongoDB")?;

    Ok(db)
}

/// Explicit override, then the URI's path, then [`FALLBACK_DATABASE`].
pub fn database_name(options: &ClientOptions, override_name: Option<&str>) -> String {
    override_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .or(options.default_database.as_deref())
        .unwrap_or(FALLBACK_DATABASE)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    async fn options(uri: &str) -> ClientOptions {
        ClientOptions::parse(uri).await.expect("uri parses")
    }

    #[rstest]
    #[case("mongodb://localhost:27017/healthy_pay", None, "healthy_pay")]
    #[case("mongodb://localhost:27017/healthy_pay?retryWrites=true", None, "healthy_pay")]
    #[case("mongodb://localhost:27017", None, FALLBACK_DATABASE)]
    #[case("mongodb://localhost:27017/healthy_pay", Some("seeded"), "seeded")]
    #[case("mongodb://localhost:27017/healthy_pay", Some("  "), "healthy_pay")]
    #[tokio::test]
    async fn database_name_resolution(
        #[case] uri: &str,
        #[case] override_name: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(database_name(&options(uri).await, override_name), expected);
    }
}
