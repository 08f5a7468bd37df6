use mongodb::bson::doc;
use mongodb::{Client, Database};

/// Connect to MongoDB and make sure the server answers before handing out
/// the handle; the driver itself connects lazily.
pub async fn get_database(uri: &str, db_name: &str) -> mongodb::error::Result<(Client, Database)> {
    let client = Client::with_uri_str(uri).await?;
    let db = client.database(db_name);

    db.run_command(doc! { "ping": 1 }).await?;
    log::info!("Connected to MongoDB database '{}'", db_name);

    Ok((client, db))
}
