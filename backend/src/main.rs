//! User registry entry-point: loads settings, connects the repository, and
//! serves the REST API with OpenAPI docs.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use user_registry::domain::ports::{StoreHealth, UserRepository};
use user_registry::inbound::http::health::HealthState;
use user_registry::outbound::persistence::{
    InMemoryUserRepository, MongoHandle, MongoUserRepository,
};
use user_registry::settings::{AppSettings, StoreSettings};

/// Repository for the configured store, plus a reachability check when the
/// store lives outside the process.
async fn build_repository(
    store: StoreSettings,
) -> std::io::Result<(Arc<dyn UserRepository>, Option<Arc<dyn StoreHealth>>)> {
    match store {
        StoreSettings::Mongo(config) => {
            let handle = MongoHandle::connect(&config)
                .await
                .map_err(|err| std::io::Error::other(format!("document store: {err}")))?;
            info!(database = config.database(), "using document store repository");
            let repository: Arc<dyn UserRepository> = Arc::new(MongoUserRepository::new(&handle));
            let health_check: Arc<dyn StoreHealth> = Arc::new(handle);
            Ok((repository, Some(health_check)))
        }
        StoreSettings::InMemory => {
            warn!("in-memory store enabled; users are lost on exit");
            let repository: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
            Ok((repository, None))
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let store = settings
        .store()
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let (repository, store_health) = build_repository(store).await?;

    let mut health = HealthState::new();
    if let Some(store_health) = store_health {
        health = health.with_store_health(store_health);
    }
    let health_state = web::Data::new(health);
    let config = ServerConfig::new(bind_addr).with_repository(repository);
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
