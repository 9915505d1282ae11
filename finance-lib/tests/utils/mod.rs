use std::sync::Arc;

use rstest::*;
use tracing::info;
use tracing::Level;

use finance_repo::expense_repo::ExpenseRepo;

pub mod mock;

macro_rules! build_app {
    ($expense_repo:expr) => {{
        let app = App::new()
            .wrap(finance_lib::tracing::create_middleware())
            .configure(finance_lib::app_config_func($expense_repo));
        tracing::info!("Built app");
        app
    }};
}

macro_rules! create_expense {
    (&$service:ident, $new_expense:expr) => {{
        let request = TestRequest::post()
            .uri("/api/expenses")
            .set_json(&$new_expense)
            .to_request();
        let response = test::call_service(&$service, request).await;
        assert!(
            response.status().is_success(),
            "Got {} response when creating expense",
            response.status()
        );
        test::read_body_json(response).await
    }};
}

#[fixture]
#[once]
pub fn tracing_setup() -> () {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
    info!("tracing initialized");
}

#[fixture]
pub fn expense_repo() -> Arc<dyn ExpenseRepo> {
    finance_repo::mem_repo::create_repos()
}
