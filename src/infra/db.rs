use sqlx::postgres::PgPoolOptions;

use crate::adapters::persistence::PostgresPersistence;

pub async fn postgres_persistence(database_url: &str) -> anyhow::Result<PostgresPersistence> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(PostgresPersistence::new(pool))
}
