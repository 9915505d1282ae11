use crate::expense_repo::ExpenseRepoError::ExpenseNotFound;
use crate::expense_repo::{
    sum_by_category, CategoryTotal, Expense, ExpenseId, ExpenseRepo, ExpenseRepoError,
    NewExpense, UserId,
};
use crate::HealthCheck;
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

struct State {
    expenses: BTreeMap<ExpenseId, Expense>,
    user_expenses: HashMap<UserId, BTreeSet<ExpenseId>>,
    next_id: ExpenseId,
}

impl State {
    fn insert(&mut self, expense: Expense) {
        self.user_expenses
            .entry(expense.user_id)
            .or_default()
            .insert(expense.id);
        self.expenses.insert(expense.id, expense);
    }

    fn remove(&mut self, expense_id: ExpenseId) -> Option<Expense> {
        let expense = self.expenses.remove(&expense_id)?;
        if let Some(ids) = self.user_expenses.get_mut(&expense.user_id) {
            ids.remove(&expense_id);
            if ids.is_empty() {
                self.user_expenses.remove(&expense.user_id);
            }
        }
        Some(expense)
    }
}

pub struct MemExpenseRepo {
    state: RwLock<State>,
}

impl MemExpenseRepo {
    pub fn new() -> MemExpenseRepo {
        Self::from_expenses(Vec::new())
    }

    /// Seeds the repo with existing expenses. New ids continue after the largest seeded id.
    pub fn from_expenses(expenses: impl IntoIterator<Item = Expense>) -> MemExpenseRepo {
        let mut state = State {
            expenses: BTreeMap::new(),
            user_expenses: HashMap::new(),
            next_id: 1,
        };
        for expense in expenses {
            state.next_id = state.next_id.max(expense.id + 1);
            state.insert(expense);
        }
        MemExpenseRepo {
            state: RwLock::new(state),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

impl Default for MemExpenseRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthCheck for MemExpenseRepo {
    async fn check(&self) -> bool {
        self.read_lock().is_ok()
    }
}

#[async_trait]
impl ExpenseRepo for MemExpenseRepo {
    async fn get_expense(&self, expense_id: ExpenseId) -> Result<Expense, ExpenseRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .expenses
            .get(&expense_id)
            .cloned()
            .ok_or(ExpenseNotFound(expense_id))
    }

    async fn get_all_expenses(&self) -> Result<Vec<Expense>, ExpenseRepoError> {
        let read_guard = self.read_lock()?;

        Ok(read_guard.expenses.values().cloned().collect())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Expense>, ExpenseRepoError> {
        let read_guard = self.read_lock()?;

        let Some(expense_ids) = read_guard.user_expenses.get(&user_id) else {
            return Ok(Vec::new());
        };

        let expenses = expense_ids
            .iter()
            .map(|id| {
                read_guard
                    .expenses
                    .get(id)
                    .cloned()
                    .ok_or_else(|| anyhow!("Expense {} missing from user index", id))
            })
            .collect::<Result<Vec<Expense>, anyhow::Error>>()?;
        Ok(expenses)
    }

    async fn create_expense(&self, new_expense: NewExpense) -> Result<Expense, ExpenseRepoError> {
        let mut write_guard = self.write_lock()?;

        let id = write_guard.next_id;
        write_guard.next_id += 1;

        let expense = new_expense.to_expense(id);
        write_guard.insert(expense.clone());

        Ok(expense)
    }

    async fn update_expense(
        &self,
        expense_id: ExpenseId,
        updated_expense: NewExpense,
    ) -> Result<Expense, ExpenseRepoError> {
        let mut write_guard = self.write_lock()?;

        if write_guard.remove(expense_id).is_none() {
            return Err(ExpenseNotFound(expense_id));
        }

        let expense = updated_expense.to_expense(expense_id);
        write_guard.insert(expense.clone());

        Ok(expense)
    }

    async fn delete_expense(&self, expense_id: ExpenseId) -> Result<Expense, ExpenseRepoError> {
        let mut write_guard = self.write_lock()?;

        write_guard
            .remove(expense_id)
            .ok_or(ExpenseNotFound(expense_id))
    }

    async fn get_category_totals(
        &self,
        user_id: Option<UserId>,
    ) -> Result<Vec<CategoryTotal>, ExpenseRepoError> {
        let expenses = match user_id {
            Some(user_id) => self.find_by_user_id(user_id).await?,
            None => self.get_all_expenses().await?,
        };

        sum_by_category(
            expenses
                .iter()
                .map(|e| (e.category.as_deref(), e.amount)),
        )
    }
}
