mod handlers;

use actix_web::{web, Scope};

pub use finance_repo::expense_repo::UserId;

pub fn user_service() -> Scope {
    web::scope("/users")
        .service(handlers::get_user_expenses)
        .service(handlers::get_user_totals)
}
