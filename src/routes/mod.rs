use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use serde_json::json;

use crate::services::ServiceError;

pub mod brands;
pub mod categories;
pub mod coupons;
pub mod customers;
pub mod main;
pub mod offers;
pub mod orders;
pub mod products;
pub mod reports;

/// Whether the client asked for JSON through the `Accept` header.
pub(crate) fn wants_json(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

/// Map a service failure onto a JSON error body with a matching status code.
pub(crate) fn json_error(err: ServiceError, action: &str) -> HttpResponse {
    let body = json!({ "error": err.to_string() });
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().json(body),
        ServiceError::NotFound => HttpResponse::NotFound().json(body),
        ServiceError::Duplicate => HttpResponse::Conflict().json(body),
        ServiceError::Form(_)
        | ServiceError::InvalidTransition { .. }
        | ServiceError::InvalidFilter(_)
        | ServiceError::InvalidFormat(_) => HttpResponse::BadRequest().json(body),
        ServiceError::StoreFailure(_) | ServiceError::Internal(_) => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().json(json!({ "error": "internal server error" }))
        }
    }
}
