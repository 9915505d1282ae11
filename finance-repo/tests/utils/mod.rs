use finance_repo::expense_repo::{ExpenseRepo, UserId};
use rand::Rng;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::{env, fs};
use tracing::info;

#[derive(Deserialize)]
struct TestConfig {
    database_url: String,
}

#[derive(Debug)]
pub enum RepoType {
    SQLx,
    Mem,
}

fn test_database_url() -> Option<String> {
    if let Ok(url) = env::var("TEST_DATABASE_URL") {
        return Some(url);
    }
    if Path::new("config_test.toml").exists() {
        let config = fs::read_to_string("config_test.toml").unwrap();
        let config: TestConfig = toml::from_str(config.as_str()).unwrap();
        return Some(config.database_url);
    }
    None
}

/// Returns `None` for the SQLx repo when no test database is configured.
pub async fn build_repo(repo_type: RepoType) -> Option<Arc<dyn ExpenseRepo>> {
    match repo_type {
        RepoType::SQLx => {
            let Some(database_url) = test_database_url() else {
                info!("No test database configured, skipping");
                return None;
            };
            let repo = finance_repo::sqlx_repo::create_repos(&database_url, 2)
                .await
                .unwrap();
            Some(repo)
        }
        RepoType::Mem => Some(finance_repo::mem_repo::create_repos()),
    }
}

/// A user id unlikely to collide with other tests sharing the same database.
#[allow(dead_code)]
pub struct TestUser {
    pub id: UserId,
    repo: Arc<dyn ExpenseRepo>,
}

#[allow(dead_code)]
impl TestUser {
    pub fn new(repo: &Arc<dyn ExpenseRepo>) -> TestUser {
        let id = rand::thread_rng().gen_range(1_000_000..i64::MAX);
        info!(%id, "Created test user");
        TestUser {
            id,
            repo: repo.clone(),
        }
    }

    pub async fn delete(&self) {
        for expense in self.repo.find_by_user_id(self.id).await.unwrap() {
            self.repo.delete_expense(expense.id).await.unwrap();
        }
    }
}
