use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use secrecy::ExposeSecret;

use pvz_app::{Stores, UseCases};
use pvz_auth::{Argon2PasswordService, JwtManager};
use pvz_infra::{AppConfig, InMemoryStore, PostgresStore, StorageBackend};

const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

fn config_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PVZ_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
        .into()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = config_path();
    let config = AppConfig::load(&path).with_context(|| format!("loading config from {}", path.display()))?;

    pvz_observability::init(&config.logging);

    let jwt = &config.auth.jwt;
    let tokens = Arc::new(JwtManager::new(
        jwt.sign.expose_secret().as_bytes(),
        jwt.issuer.clone(),
        jwt.token_ttl(),
    ));
    let passwords = Arc::new(Argon2PasswordService);

    let mut postgres = None;
    let stores = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on restart");
            Stores::from_backend(Arc::new(InMemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let store = PostgresStore::connect(&config.postgres)
                .await
                .context("connecting to postgres")?;
            store.migrate().await.context("running migrations")?;
            store.seed_dummy_users().await.context("seeding dummy users")?;

            let store = Arc::new(store);
            postgres = Some(store.clone());
            Stores::from_backend(store)
        }
    };

    let use_cases = UseCases::new(stores, tokens, passwords);
    let server = pvz_api::Server::bind(&config.http.bind_address(), pvz_api::build_app(use_cases))
        .await
        .with_context(|| format!("binding {}", config.http.bind_address()))?;

    tracing::info!(addr = %server.local_addr()?, "listening");
    server.serve(pvz_api::shutdown_signal()).await?;

    if let Some(store) = postgres {
        store.close().await;
    }
    tracing::info!("stopped");
    Ok(())
}
