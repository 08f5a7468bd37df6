use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http, middleware::Logger, web};
use anyhow::Context;
use dotenv::dotenv;
use env_logger::Env;

use snipurl::config::app_config::AppConfig;
use snipurl::routes::init_routes;
use snipurl::services::link_service::LinkService;
use snipurl::state::app_state::AppState;
use snipurl::store::MongoLinkStore;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()?;

    // Initialize the database connection
    let store = MongoLinkStore::connect(&config.mongodb_uri, &config.mongodb_db)
        .await
        .context("Error connecting to the database")?;

    let links = LinkService::new(Arc::new(store.clone()), config.base_url.clone())
        .with_max_attempts(config.max_generate_attempts);
    let app_state = web::Data::new(AppState::new(links));
    let allowed_origins = config.allowed_origins.clone();

    log::info!(
        "Server is running on {}:{} (short links under {})",
        config.host,
        config.port,
        config.base_url
    );

    HttpServer::new(move || {
        let logger = Logger::new("%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %D ms");
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![http::header::ACCEPT, http::header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);
        App::new()
            .wrap(logger)
            .wrap(cors)
            .app_data(app_state.clone())
            .configure(init_routes)
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?
    .run()
    .await?;

    store.shutdown().await;
    Ok(())
}
