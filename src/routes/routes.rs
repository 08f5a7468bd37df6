use actix_web::web;

use crate::errors::json_config;
use crate::handlers::health_handlers::health_check;
use crate::handlers::link_handlers::{
    create_short_url, get_recent_urls, get_url_analytics, redirect_to_url,
};

/// Configure the routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .route("/shorten", web::post().to(create_short_url))
            .route("/urls", web::get().to(get_recent_urls))
            .route("/analytics/{code}", web::get().to(get_url_analytics))
            .route("/health", web::get().to(health_check)),
    );
    // Registered last so it never shadows the API scope
    cfg.route("/{code}", web::get().to(redirect_to_url));
}
