use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, error, web};
use serde::Serialize;

use crate::services::link_service::LinkError;

pub const SERVER_ERROR: &str = "Server error, please try again";
pub const INVALID_BODY: &str = "Invalid request body";

#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl ResponseError for LinkError {
    fn status_code(&self) -> StatusCode {
        match self {
            LinkError::InvalidUrl | LinkError::InvalidLength | LinkError::CodeTaken => {
                StatusCode::BAD_REQUEST
            }
            LinkError::NotFound => StatusCode::NOT_FOUND,
            LinkError::CodeSpaceExhausted(_) | LinkError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Internal causes go to the log, never to the client.
        let message = if status.is_server_error() {
            log::error!("Request failed: {}", self);
            SERVER_ERROR.to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(ErrorResponse::new(message))
    }
}

/// JSON extractor config that answers unparsable bodies with a JSON 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected request body: {}", err);
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ErrorResponse::new(INVALID_BODY)),
        )
        .into()
    })
}
