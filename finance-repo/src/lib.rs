use async_trait::async_trait;

pub mod expense_repo;

// implementation modules
pub mod mem_repo;
pub mod sqlx_repo;

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> bool;
}
