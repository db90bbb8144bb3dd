//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The state holds the configuration, the content
//! generator wrapping the configured AI provider, and the upload store.

use crate::{config::AppConfig, upload::UploadStore};
use std::{sync::Arc, time::Duration};
use synopdf::{
    providers::{ai::AiProvider, factory::create_provider},
    ContentGenerator,
};
use synopdf_pdf::PageLayout;
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    pub generator: Arc<ContentGenerator>,
    pub uploads: Arc<UploadStore>,
    pub page_layout: PageLayout,
}

/// Builds the shared application state from the configuration, instantiating
/// the provider named in it.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let provider = create_provider(
        config.provider,
        config.api_url.as_deref(),
        &config.token,
        &config.model,
    )?;
    build_app_state_with_provider(config, provider).await
}

/// Builds the state around an already constructed provider.
pub async fn build_app_state_with_provider(
    config: AppConfig,
    provider: Box<dyn AiProvider>,
) -> anyhow::Result<AppState> {
    let uploads = UploadStore::new(&config.upload_dir).await?;
    let timeout = Duration::from_secs(config.request_timeout_secs);
    info!(?timeout, model = %config.model, "Content generator configured.");

    Ok(AppState {
        generator: Arc::new(ContentGenerator::new(provider, timeout)),
        uploads: Arc::new(uploads),
        page_layout: PageLayout::default(),
        config: Arc::new(config),
    })
}
