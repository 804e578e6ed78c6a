use anyhow::Context;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgCreationStore};
use crate::identity::ClerkIdentityProvider;
use crate::providers::cloudinary::CloudinaryCredentials;
use crate::providers::{ClipdropClient, CloudinaryClient, OpenAiCompatibleClient, PdfTextExtractor};
use crate::routes::app;
use crate::services::{CreationAdapters, CreationService, EntitlementLedger};
use crate::state::AppState;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Address to bind (overrides BIND_ADDRESS)")]
    pub bind: Option<String>,
}

pub async fn handle(args: ServeArgs, mut config: AppConfig) -> anyhow::Result<()> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    info!("Starting Creations API in {:?} mode", config.environment);

    let state = build_state(config).await?;
    let bind_addr = format!("{}:{}", state.config.server.bind, state.config.server.port);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Creations API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}

/// Wire configuration into vendor clients, the store and the creation service
pub async fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let timeout = Duration::from_secs(config.providers.request_timeout_secs);
    let providers = &config.providers;

    let pool = DatabaseManager::connect_lazy(&config.database)?;
    if config.database.ensure_schema {
        let pool = pool.clone();
        tokio::spawn(async move {
            if let Err(e) = DatabaseManager::ensure_schema(&pool).await {
                warn!(error = %e, "could not ensure creations schema");
            }
        });
    }
    let store = Arc::new(PgCreationStore::new(pool));

    let identity = Arc::new(ClerkIdentityProvider::new(
        &config.identity.clerk_api_url,
        &config.identity.clerk_secret_key,
        timeout,
    )?);

    let text = Arc::new(OpenAiCompatibleClient::new(
        &providers.text_base_url,
        &providers.text_api_key,
        &providers.text_model,
        timeout,
    )?);
    let images = Arc::new(ClipdropClient::new(
        &providers.clipdrop_url,
        &providers.clipdrop_api_key,
        timeout,
    )?);
    let delivery_base = url::Url::parse(&providers.cloudinary_delivery_url)
        .context("CLOUDINARY_DELIVERY_URL is not a valid URL")?;
    let media = Arc::new(CloudinaryClient::new(
        &providers.cloudinary_api_url,
        delivery_base,
        CloudinaryCredentials {
            cloud_name: providers.cloudinary_cloud_name.clone(),
            api_key: providers.cloudinary_api_key.clone(),
            api_secret: providers.cloudinary_api_secret.clone(),
        },
        timeout,
    )?);

    let adapters = CreationAdapters::from_clients(text, images, media, Arc::new(PdfTextExtractor));
    let ledger = EntitlementLedger::new(identity.clone(), &config.entitlement);
    let creations = Arc::new(CreationService::new(ledger, store.clone(), adapters));

    Ok(AppState {
        config: Arc::new(config),
        identity,
        store,
        creations,
    })
}
