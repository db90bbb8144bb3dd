//! # Common Test Utilities
//!
//! `TestApp` spawns the real server on a random port with a temporary
//! configuration and upload directory. The AI endpoint is either an
//! `httpmock::MockServer` speaking the chat completions protocol or an
//! in-process `MockAiProvider`.

// Not every test binary uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use httpmock::MockServer;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use std::{fs, net::SocketAddr, path::PathBuf};
use synopdf_server::{
    config, router,
    state::{build_app_state, build_app_state_with_provider, AppState},
};
use synopdf_test_utils::MockAiProvider;
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

pub const CHAT_PATH: &str = "/v1/chat/completions";

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub upload_dir: PathBuf,
    pub app_state: AppState,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server against an httpmock chat completions endpoint.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_settings("").await
    }

    /// Like [`TestApp::spawn`], with extra YAML lines appended to the config.
    pub async fn spawn_with_settings(extra_yaml: &str) -> Result<Self> {
        let mock_server = MockServer::start();
        let (config_dir, config) = write_config(&mock_server, extra_yaml)?;
        let app_state = build_app_state(config).await?;
        Self::spawn_with_state(app_state, mock_server, config_dir).await
    }

    /// Spawns the server with an in-process provider instead of HTTP.
    pub async fn spawn_with_provider(provider: MockAiProvider) -> Result<Self> {
        let mock_server = MockServer::start();
        let (config_dir, config) = write_config(&mock_server, "")?;
        let app_state = build_app_state_with_provider(config, Box::new(provider)).await?;
        Self::spawn_with_state(app_state, mock_server, config_dir).await
    }

    async fn spawn_with_state(
        app_state: AppState,
        mock_server: MockServer,
        config_dir: TempDir,
    ) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let upload_dir = app_state.uploads.dir().to_path_buf();
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            upload_dir,
            app_state: app_state_for_harness,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Posts a multipart form to `/generate_presentation`.
    pub async fn post_presentation(&self, form: Form) -> reqwest::Response {
        self.client
            .post(format!("{}/generate_presentation", self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Number of files currently in the upload directory.
    pub fn stored_uploads(&self) -> usize {
        fs::read_dir(&self.upload_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn write_config(
    mock_server: &MockServer,
    extra_yaml: &str,
) -> Result<(TempDir, config::AppConfig)> {
    let config_dir = tempdir()?;
    let config_path = config_dir.path().join("config.yml");
    let upload_dir = config_dir.path().join("uploads");
    let content = format!(
        r#"
token: "test-token"
host: "127.0.0.1"
port: 0
provider: openai
api_url: "{}"
model: "mock-chat-model"
upload_dir: "{}"
{extra_yaml}
"#,
        mock_server.url(CHAT_PATH),
        upload_dir.display(),
    );
    fs::write(&config_path, content)?;

    let config_path = config_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("temp path is not UTF-8"))?;
    let config = config::get_config(Some(config_path))?;
    Ok((config_dir, config))
}

/// A multipart form carrying `pdf` as `pdf_file` plus the given text fields.
pub fn presentation_form(pdf: Vec<u8>, file_name: &str, fields: &[(&str, &str)]) -> Form {
    let part = Part::bytes(pdf)
        .file_name(file_name.to_string())
        .mime_str("application/pdf")
        .expect("valid mime type");
    fields
        .iter()
        .fold(Form::new().part("pdf_file", part), |form, (name, value)| {
            form.text(name.to_string(), value.to_string())
        })
}

/// A chat completions body with one choice per entry.
pub fn completion_body(choices: &[&str]) -> serde_json::Value {
    let choices: Vec<_> = choices
        .iter()
        .map(|content| {
            serde_json::json!({ "message": { "role": "assistant", "content": content } })
        })
        .collect();
    serde_json::json!({ "choices": choices })
}
