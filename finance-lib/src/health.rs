use actix_web::{web, HttpResponse, Responder};
use finance_repo::expense_repo::ExpenseRepo;
use std::sync::Arc;

#[get("/health")]
pub async fn health_check(expense_repo: web::Data<Arc<dyn ExpenseRepo>>) -> impl Responder {
    if expense_repo.check().await {
        HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
    } else {
        HttpResponse::ServiceUnavailable().json(serde_json::json!({ "status": "unavailable" }))
    }
}
