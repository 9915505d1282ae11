mod expense_repo;

use crate::expense_repo::{ExpenseRepo, ExpenseRepoError};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub use expense_repo::SQLxExpenseRepo;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connects to Postgres, runs the embedded migrations and returns the repo.
pub async fn create_repos(
    database_url: &str,
    max_pool_size: u32,
) -> Result<Arc<dyn ExpenseRepo>, anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_pool_size)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .context("Unable to connect to database")?;

    run_migrations(&pool).await?;

    Ok(Arc::new(SQLxExpenseRepo::new(pool)))
}

pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), anyhow::Error> {
    info!("Running migrations");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Unable to run migrations")
}

/// Connectivity failures mean the store could not be reached at all, as opposed to a query
/// that reached it and failed.
fn is_unavailable(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

trait RepoContext<T> {
    fn repo_context<C, F>(self, f: F) -> Result<T, ExpenseRepoError>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> RepoContext<T> for Result<T, sqlx::Error> {
    fn repo_context<C, F>(self, f: F) -> Result<T, ExpenseRepoError>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let unavailable = is_unavailable(&e);
            let e = anyhow::Error::new(e).context(f());
            if unavailable {
                ExpenseRepoError::StorageUnavailable(e)
            } else {
                ExpenseRepoError::Other(e)
            }
        })
    }
}
