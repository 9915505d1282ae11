use crate::error::HandlerError;
use crate::expense::ExpenseTotals;
use actix_web::{web, HttpResponse, Responder};
use finance_repo::expense_repo::{ExpenseId, ExpenseRepo, NewExpense};
use std::sync::Arc;

#[get("")]
pub async fn get_all_expenses(
    expense_repo: web::Data<Arc<dyn ExpenseRepo>>,
) -> Result<impl Responder, HandlerError> {
    let expenses = expense_repo.get_all_expenses().await?;
    Ok(HttpResponse::Ok().json(expenses))
}

#[post("")]
pub async fn create_expense(
    expense_repo: web::Data<Arc<dyn ExpenseRepo>>,
    new_expense: web::Json<NewExpense>,
) -> Result<impl Responder, HandlerError> {
    let expense = expense_repo.create_expense(new_expense.into_inner()).await?;
    Ok(HttpResponse::Ok().json(expense))
}

#[get("/totals")]
pub async fn get_totals(
    expense_repo: web::Data<Arc<dyn ExpenseRepo>>,
) -> Result<impl Responder, HandlerError> {
    let category_totals = expense_repo.get_category_totals(None).await?;
    let totals = ExpenseTotals::from_category_totals(category_totals)?;
    Ok(HttpResponse::Ok().json(totals))
}

#[get("/{expense_id}")]
pub async fn get_expense(
    expense_repo: web::Data<Arc<dyn ExpenseRepo>>,
    expense_id: web::Path<ExpenseId>,
) -> Result<impl Responder, HandlerError> {
    let expense = expense_repo.get_expense(expense_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(expense))
}

#[put("/{expense_id}")]
pub async fn update_expense(
    expense_repo: web::Data<Arc<dyn ExpenseRepo>>,
    expense_id: web::Path<ExpenseId>,
    updated_expense: web::Json<NewExpense>,
) -> Result<impl Responder, HandlerError> {
    let expense = expense_repo
        .update_expense(expense_id.into_inner(), updated_expense.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(expense))
}

#[delete("/{expense_id}")]
pub async fn delete_expense(
    expense_repo: web::Data<Arc<dyn ExpenseRepo>>,
    expense_id: web::Path<ExpenseId>,
) -> Result<impl Responder, HandlerError> {
    let expense = expense_repo
        .delete_expense(expense_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(expense))
}
