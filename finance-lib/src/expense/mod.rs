use actix_web::{web, Scope};
use finance_repo::expense_repo::CategoryTotal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub(crate) mod handlers;

pub fn expense_service() -> Scope {
    web::scope("/expenses")
        .service(handlers::get_all_expenses)
        .service(handlers::create_expense)
        // before the id routes, "totals" is not an id
        .service(handlers::get_totals)
        .service(handlers::get_expense)
        .service(handlers::update_expense)
        .service(handlers::delete_expense)
}

/// Overall and per-category sums of expense amounts.
#[derive(Serialize, Deserialize, PartialEq, Debug)]
pub struct ExpenseTotals {
    pub total: Decimal,
    pub categories: BTreeMap<String, Decimal>,
}

#[derive(Error, Debug)]
#[error("Total of all categories overflowed")]
pub struct TotalsOverflow;

impl ExpenseTotals {
    pub fn from_category_totals(
        category_totals: Vec<CategoryTotal>,
    ) -> Result<ExpenseTotals, TotalsOverflow> {
        let categories: BTreeMap<String, Decimal> = category_totals
            .into_iter()
            .map(|t| (t.category, t.total))
            .collect();
        let total = categories
            .values()
            .try_fold(Decimal::ZERO, |sum, total| sum.checked_add(*total))
            .ok_or(TotalsOverflow)?;
        Ok(ExpenseTotals { total, categories })
    }
}
