use crate::error::HandlerError;
use crate::expense::ExpenseTotals;
use crate::user::UserId;
use actix_web::{web, HttpResponse, Responder};
use finance_repo::expense_repo::ExpenseRepo;
use std::sync::Arc;
use tracing_actix_web::RootSpan;

#[get("/{user_id}/expenses")]
pub async fn get_user_expenses(
    expense_repo: web::Data<Arc<dyn ExpenseRepo>>,
    user_id: web::Path<UserId>,
    root_span: RootSpan,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    root_span.record("user_id", user_id);

    let expenses = expense_repo.find_by_user_id(user_id).await?;
    Ok(HttpResponse::Ok().json(expenses))
}

#[get("/{user_id}/expenses/totals")]
pub async fn get_user_totals(
    expense_repo: web::Data<Arc<dyn ExpenseRepo>>,
    user_id: web::Path<UserId>,
    root_span: RootSpan,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    root_span.record("user_id", user_id);

    let category_totals = expense_repo.get_category_totals(Some(user_id)).await?;
    let totals = ExpenseTotals::from_category_totals(category_totals)?;
    Ok(HttpResponse::Ok().json(totals))
}
