#[macro_use(get, post, put, delete)]
extern crate actix_web;

use actix_cors::Cors;
use actix_web::error::JsonPayloadError;
use actix_web::web::{Data, ServiceConfig};
use actix_web::{web, HttpResponse};
use finance_repo::expense_repo::ExpenseRepo;
use std::sync::Arc;
use ::tracing::error;

pub mod config;
mod error;
pub mod expense;
pub mod health;
pub mod tracing;
pub mod user;

/// Registers the repo and every route of the service under `/api`, plus `/health`.
pub fn app_config_func(expense_repo: Arc<dyn ExpenseRepo>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(Data::new(expense_repo))
            .app_data(json_config())
            .service(
                web::scope("/api")
                    .service(expense::expense_service())
                    .service(user::user_service()),
            )
            .service(health::health_check);
    }
}

/// Answers malformed JSON bodies with a 400 describing the problem.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        error!(req_path = req.path(), %err);
        match err {
            JsonPayloadError::Deserialize(deserialize_err) => {
                let error_body = serde_json::json!({
                    "error": "Unable to parse JSON payload",
                    "detail": format!("{}", deserialize_err),
                });
                actix_web::error::InternalError::from_response(
                    deserialize_err,
                    HttpResponse::BadRequest()
                        .content_type("application/json")
                        .body(error_body.to_string()),
                )
                .into()
            }
            _ => err.into(),
        }
    })
}

pub fn create_cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
}
