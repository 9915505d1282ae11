#[macro_use]
extern crate tracing;

use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{App, HttpServer};
use anyhow::{anyhow, Context};
use rustls::{Certificate, PrivateKey, ServerConfig};
use rustls_pemfile::{certs, pkcs8_private_keys};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;

use finance_lib::config::{Config, SSLConfig};
use finance_repo::expense_repo::ExpenseRepo;

const SERVICE_NAME: &str = "finance-server";

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = registry::Registry::default()
        .with(LevelFilter::INFO)
        .with(tracing_subscriber::fmt::Layer::default());
    let tracing_guard = tracing::subscriber::set_default(subscriber);
    info!("tracing initialized");

    let config = load_config()?;

    let telemetry_layer = config
        .honeycomb
        .as_ref()
        .map(|honeycomb| finance_lib::tracing::create_opentelemetry_layer(SERVICE_NAME, honeycomb))
        .transpose()?;

    let subscriber = registry::Registry::default()
        .with(config.level_filter()?)
        .with(tracing_subscriber::fmt::Layer::default())
        .with(telemetry_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    drop(tracing_guard);

    let expense_repo: Arc<dyn ExpenseRepo> = match &config.database_url {
        Some(database_url) => {
            finance_repo::sqlx_repo::create_repos(database_url, config.max_pool_size).await?
        }
        None => {
            warn!("No database configured, expenses are kept in memory");
            finance_repo::mem_repo::create_repos()
        }
    };

    let cors_allowed_origins = config.cors_allowed_origins.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(finance_lib::create_cors(&cors_allowed_origins))
            .wrap(finance_lib::tracing::create_middleware())
            .configure(finance_lib::app_config_func(expense_repo.clone()))
    });
    let server = match &config.ssl {
        None => {
            warn!("Using http");
            server.bind(&config.bind_address)?
        }
        Some(ssl_config) => {
            info!("Using https");
            server.bind_rustls(&config.bind_address, load_rustls_config(ssl_config)?)?
        }
    };
    info!(bind_address = %config.bind_address, "Server started");
    server.run().await?;

    Ok(())
}

/// Reads the config file named on the command line, then `config.toml` in the working or
/// configuration directory, and otherwise the environment.
fn load_config() -> Result<Config, anyhow::Error> {
    if let Some(path) = std::env::args_os().nth(1) {
        return Config::from_file(&PathBuf::from(path));
    }
    match get_config_file() {
        Some(path) => {
            info!("Loading config from {}", path.display());
            Config::from_file(&path)
        }
        None => {
            info!("Config file not found, reading config from environment");
            Config::from_env()
        }
    }
}

fn get_config_file() -> Option<PathBuf> {
    let config_current_dir = PathBuf::from("config.toml");
    if config_current_dir.exists() {
        return Some(config_current_dir);
    }
    if let Ok(config_env) = std::env::var("CONFIGURATION_DIRECTORY") {
        let config_path = PathBuf::from(config_env).join("config.toml");
        if config_path.exists() {
            return Some(config_path);
        }
    }

    None
}

fn load_rustls_config(ssl_config: &SSLConfig) -> Result<ServerConfig, anyhow::Error> {
    let config = ServerConfig::builder()
        .with_safe_defaults()
        .with_no_client_auth();

    let mut cert_file = BufReader::new(
        File::open(&ssl_config.certificate_chain_file)
            .context("Error opening certificate chain file")?,
    );
    let mut key_file = BufReader::new(
        File::open(&ssl_config.private_key_file).context("Error opening private key file")?,
    );

    let cert_chain = certs(&mut cert_file)
        .context("Unable to read certificate chain file")?
        .into_iter()
        .map(Certificate)
        .collect();
    let mut keys: Vec<PrivateKey> = pkcs8_private_keys(&mut key_file)
        .context("Unable to read private key file")?
        .into_iter()
        .map(PrivateKey)
        .collect();

    if keys.is_empty() {
        return Err(anyhow!("No private key found in file"));
    }

    config
        .with_single_cert(cert_chain, keys.remove(0))
        .context("Invalid certificate or private key")
}
