use crate::HealthCheck;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub type ExpenseId = i64;
pub type UserId = i64;

/// Category key used for expenses without a category.
pub const UNCATEGORIZED: &str = "uncategorized";

#[async_trait]
pub trait ExpenseRepo: HealthCheck + Sync + Send {
    async fn get_expense(&self, expense_id: ExpenseId) -> Result<Expense, ExpenseRepoError>;

    async fn get_all_expenses(&self) -> Result<Vec<Expense>, ExpenseRepoError>;

    /// Returns every expense owned by `user_id`, ordered by id. An unknown user simply owns no
    /// expenses.
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Expense>, ExpenseRepoError>;

    async fn create_expense(&self, new_expense: NewExpense) -> Result<Expense, ExpenseRepoError>;

    async fn update_expense(
        &self,
        expense_id: ExpenseId,
        updated_expense: NewExpense,
    ) -> Result<Expense, ExpenseRepoError>;

    async fn delete_expense(&self, expense_id: ExpenseId) -> Result<Expense, ExpenseRepoError>;

    /// Sums expense amounts per category key, ordered by key. Covers all users when `user_id`
    /// is `None`.
    async fn get_category_totals(
        &self,
        user_id: Option<UserId>,
    ) -> Result<Vec<CategoryTotal>, ExpenseRepoError>;
}

#[derive(Error, Debug)]
pub enum ExpenseRepoError {
    #[error("Expense with id {0} not found")]
    ExpenseNotFound(ExpenseId),
    #[error("Storage unavailable: {0:#}")]
    StorageUnavailable(anyhow::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Expense {
    pub id: ExpenseId,
    pub user_id: UserId,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category: Option<String>,
}

impl Expense {
    pub const fn new(
        id: ExpenseId,
        user_id: UserId,
        description: String,
        amount: Decimal,
        date: NaiveDate,
        category: Option<String>,
    ) -> Expense {
        Expense {
            id,
            user_id,
            description,
            amount,
            date,
            category,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct NewExpense {
    pub user_id: UserId,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewExpense {
    pub const fn new(
        user_id: UserId,
        description: String,
        amount: Decimal,
        date: NaiveDate,
        category: Option<String>,
    ) -> NewExpense {
        NewExpense {
            user_id,
            description,
            amount,
            date,
            category,
        }
    }

    pub fn to_expense(self, id: ExpenseId) -> Expense {
        Expense::new(
            id,
            self.user_id,
            self.description,
            self.amount,
            self.date,
            self.category,
        )
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

impl CategoryTotal {
    pub const fn new(category: String, total: Decimal) -> CategoryTotal {
        CategoryTotal { category, total }
    }
}

/// Lower-cased category name, or [UNCATEGORIZED] when missing or empty.
pub fn category_key(category: Option<&str>) -> String {
    match category {
        Some(c) if !c.is_empty() => c.to_lowercase(),
        _ => UNCATEGORIZED.to_owned(),
    }
}

/// Sums amounts per [category_key], ordered by key. A sum outside the `Decimal` range is an
/// error rather than a panic.
pub fn sum_by_category<'a>(
    amounts: impl IntoIterator<Item = (Option<&'a str>, Decimal)>,
) -> Result<Vec<CategoryTotal>, ExpenseRepoError> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for (category, amount) in amounts {
        let key = category_key(category);
        let total = totals.entry(key).or_insert(Decimal::ZERO);
        *total = total.checked_add(amount).ok_or_else(|| {
            anyhow!(
                "Total for category {} overflowed",
                category_key(category)
            )
        })?;
    }

    Ok(totals
        .into_iter()
        .map(|(category, total)| CategoryTotal::new(category, total))
        .collect())
}
