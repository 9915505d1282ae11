use crate::expense_repo::ExpenseRepoError::ExpenseNotFound;
use crate::expense_repo::{
    sum_by_category, CategoryTotal, Expense, ExpenseId, ExpenseRepo, ExpenseRepoError,
    NewExpense, UserId,
};
use crate::sqlx_repo::RepoContext;
use crate::HealthCheck;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{query_as, query_scalar, Pool, Postgres, QueryBuilder};
use tracing::{instrument, warn};

const EXPENSE_COLUMNS: &str = "id, user_id, description, amount, date, category";

#[derive(sqlx::FromRow)]
struct ExpenseEntry {
    id: i64,
    user_id: i64,
    description: String,
    amount: Decimal,
    date: NaiveDate,
    category: Option<String>,
}

impl From<ExpenseEntry> for Expense {
    fn from(value: ExpenseEntry) -> Self {
        Expense::new(
            value.id,
            value.user_id,
            value.description,
            value.amount,
            value.date,
            value.category,
        )
    }
}

#[derive(sqlx::FromRow)]
struct CategoryAmountResult {
    category: Option<String>,
    amount: Decimal,
}

pub struct SQLxExpenseRepo {
    pool: Pool<Postgres>,
}

impl SQLxExpenseRepo {
    pub fn new(pool: Pool<Postgres>) -> SQLxExpenseRepo {
        SQLxExpenseRepo { pool }
    }

    #[instrument(skip(self))]
    async fn get_expense_entries(
        &self,
        user_id: Option<UserId>,
    ) -> Result<Vec<ExpenseEntry>, ExpenseRepoError> {
        let mut query_builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {EXPENSE_COLUMNS} FROM expenses"));
        if let Some(user_id) = user_id {
            query_builder.push(" WHERE user_id = ").push_bind(user_id);
        }
        query_builder.push(" ORDER BY id");

        let expense_entries: Vec<ExpenseEntry> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .repo_context(|| match user_id {
                Some(user_id) => format!("Unable to get expenses for user {}", user_id),
                None => "Unable to get expenses".to_owned(),
            })?;
        Ok(expense_entries)
    }
}

#[async_trait]
impl HealthCheck for SQLxExpenseRepo {
    async fn check(&self) -> bool {
        let result: Result<i32, sqlx::Error> =
            query_scalar("SELECT 1").fetch_one(&self.pool).await;
        if let Err(e) = &result {
            warn!(%e, "Database health check failed");
        }
        result.is_ok()
    }
}

#[async_trait]
impl ExpenseRepo for SQLxExpenseRepo {
    #[instrument(skip(self))]
    async fn get_expense(&self, expense_id: ExpenseId) -> Result<Expense, ExpenseRepoError> {
        let expense_entry: Option<ExpenseEntry> = query_as(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = $1"
        ))
        .bind(expense_id)
        .fetch_optional(&self.pool)
        .await
        .repo_context(|| format!("Unable to get expense {}", expense_id))?;

        expense_entry
            .map(|e| e.into())
            .ok_or(ExpenseNotFound(expense_id))
    }

    #[instrument(skip(self))]
    async fn get_all_expenses(&self) -> Result<Vec<Expense>, ExpenseRepoError> {
        let expenses = self
            .get_expense_entries(None)
            .await?
            .into_iter()
            .map(|expense_entry| expense_entry.into())
            .collect();
        Ok(expenses)
    }

    #[instrument(skip(self))]
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Expense>, ExpenseRepoError> {
        let expenses = self
            .get_expense_entries(Some(user_id))
            .await?
            .into_iter()
            .map(|expense_entry| expense_entry.into())
            .collect();
        Ok(expenses)
    }

    #[instrument(skip(self, new_expense))]
    async fn create_expense(&self, new_expense: NewExpense) -> Result<Expense, ExpenseRepoError> {
        let id: ExpenseId = query_scalar(
            "INSERT INTO expenses(user_id, description, amount, date, category) VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(new_expense.user_id)
        .bind(&new_expense.description)
        .bind(new_expense.amount)
        .bind(new_expense.date)
        .bind(&new_expense.category)
        .fetch_one(&self.pool)
        .await
        .repo_context(|| "Unable to insert expense")?;

        Ok(new_expense.to_expense(id))
    }

    #[instrument(skip(self, updated_expense))]
    async fn update_expense(
        &self,
        expense_id: ExpenseId,
        updated_expense: NewExpense,
    ) -> Result<Expense, ExpenseRepoError> {
        let result = sqlx::query(
            "UPDATE expenses SET user_id = $1, description = $2, amount = $3, date = $4, category = $5 WHERE id = $6",
        )
        .bind(updated_expense.user_id)
        .bind(&updated_expense.description)
        .bind(updated_expense.amount)
        .bind(updated_expense.date)
        .bind(&updated_expense.category)
        .bind(expense_id)
        .execute(&self.pool)
        .await
        .repo_context(|| format!("Unable to update expense {}", expense_id))?;

        if result.rows_affected() == 0 {
            Err(ExpenseNotFound(expense_id))
        } else {
            Ok(updated_expense.to_expense(expense_id))
        }
    }

    #[instrument(skip(self))]
    async fn delete_expense(&self, expense_id: ExpenseId) -> Result<Expense, ExpenseRepoError> {
        let expense_entry: ExpenseEntry = query_as(&format!(
            "DELETE FROM expenses WHERE id = $1 RETURNING {EXPENSE_COLUMNS}"
        ))
        .bind(expense_id)
        .fetch_optional(&self.pool)
        .await
        .repo_context(|| format!("Unable to delete expense {}", expense_id))?
        .ok_or(ExpenseNotFound(expense_id))?;

        Ok(expense_entry.into())
    }

    #[instrument(skip(self))]
    async fn get_category_totals(
        &self,
        user_id: Option<UserId>,
    ) -> Result<Vec<CategoryTotal>, ExpenseRepoError> {
        // keys are folded in Rust, LOWER() depends on the database collation
        let mut query_builder =
            QueryBuilder::<Postgres>::new("SELECT category, amount FROM expenses");
        if let Some(user_id) = user_id {
            query_builder.push(" WHERE user_id = ").push_bind(user_id);
        }

        let amounts: Vec<CategoryAmountResult> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .repo_context(|| "Unable to get category totals")?;

        sum_by_category(
            amounts
                .iter()
                .map(|result| (result.category.as_deref(), result.amount)),
        )
    }
}
