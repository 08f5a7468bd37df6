use actix_web::{HttpResponse, Responder, Result, http, web};

use crate::errors::ErrorResponse;
use crate::models::link::NewLink;
use crate::services::link_service::LinkError;
use crate::state::app_state::AppState;
use crate::structs::link_response::{AnalyticsResponse, RecentUrlResponse, ShortenResponse};
use crate::utils::short_code::redirect_location;

/// Create a shortened URL
pub async fn create_short_url(
    app_state: web::Data<AppState>,
    web::Json(req): web::Json<NewLink>,
) -> Result<impl Responder, LinkError> {
    let links = &app_state.links;
    let record = links.create(req).await?;
    log::info!("Created short code '{}' -> {}", record.short_code, record.original_url);

    let short_url = links.short_url(&record);
    Ok(HttpResponse::Created().json(ShortenResponse::new(record, short_url)))
}

/// Redirect to the original URL, counting the click
pub async fn redirect_to_url(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder> {
    let code = path.into_inner();

    let failed = || HttpResponse::InternalServerError().json(ErrorResponse::new("Server error"));

    match app_state.links.resolve(&code).await {
        Ok(record) => match redirect_location(&record.original_url) {
            Some(location) => Ok(HttpResponse::Found()
                .append_header((http::header::LOCATION, location))
                .finish()),
            None => {
                log::error!(
                    "Stored URL for '{}' no longer parses: {:?}",
                    code,
                    record.original_url
                );
                Ok(failed())
            }
        },
        Err(LinkError::NotFound) => {
            Ok(HttpResponse::NotFound().json(ErrorResponse::new("URL not found")))
        }
        Err(e) => {
            log::error!("Error redirecting '{}': {}", code, e);
            Ok(failed())
        }
    }
}

/// Get analytics for a specific URL
pub async fn get_url_analytics(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, LinkError> {
    let links = &app_state.links;
    let record = links.get_analytics(&path.into_inner()).await?;

    let short_url = links.short_url(&record);
    Ok(HttpResponse::Ok().json(AnalyticsResponse::new(record, short_url)))
}

/// The ten most recently created URLs
pub async fn get_recent_urls(app_state: web::Data<AppState>) -> Result<impl Responder, LinkError> {
    let links = &app_state.links;
    let recent: Vec<RecentUrlResponse> = links
        .list_recent()
        .await?
        .into_iter()
        .map(|record| {
            let short_url = links.short_url(&record);
            RecentUrlResponse::new(record, short_url)
        })
        .collect();

    Ok(HttpResponse::Ok().json(recent))
}
