use anyhow::anyhow;
use async_trait::async_trait;
use finance_repo::expense_repo::{
    CategoryTotal, Expense, ExpenseId, ExpenseRepo, ExpenseRepoError, NewExpense, UserId,
};
use finance_repo::HealthCheck;

/// A repo whose backing store can never be reached.
pub struct UnavailableExpenseRepo;

fn unavailable() -> ExpenseRepoError {
    ExpenseRepoError::StorageUnavailable(anyhow!("connection refused"))
}

#[async_trait]
impl HealthCheck for UnavailableExpenseRepo {
    async fn check(&self) -> bool {
        false
    }
}

#[async_trait]
impl ExpenseRepo for UnavailableExpenseRepo {
    async fn get_expense(&self, _expense_id: ExpenseId) -> Result<Expense, ExpenseRepoError> {
        Err(unavailable())
    }

    async fn get_all_expenses(&self) -> Result<Vec<Expense>, ExpenseRepoError> {
        Err(unavailable())
    }

    async fn find_by_user_id(&self, _user_id: UserId) -> Result<Vec<Expense>, ExpenseRepoError> {
        Err(unavailable())
    }

    async fn create_expense(&self, _new_expense: NewExpense) -> Result<Expense, ExpenseRepoError> {
        Err(unavailable())
    }

    async fn update_expense(
        &self,
        _expense_id: ExpenseId,
        _updated_expense: NewExpense,
    ) -> Result<Expense, ExpenseRepoError> {
        Err(unavailable())
    }

    async fn delete_expense(&self, _expense_id: ExpenseId) -> Result<Expense, ExpenseRepoError> {
        Err(unavailable())
    }

    async fn get_category_totals(
        &self,
        _user_id: Option<UserId>,
    ) -> Result<Vec<CategoryTotal>, ExpenseRepoError> {
        Err(unavailable())
    }
}
