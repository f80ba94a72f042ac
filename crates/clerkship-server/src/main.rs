use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use clerkship_storage::{DocumentStore, MemoryStore, S3DocumentStore};
use clerkship_wizard::CaseFiles;

mod config;
mod error;
mod middleware;
mod routes;
mod state;

use config::{ServerConfig, StoreBackend};
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ServerConfig::from_env()?;
    let case = Arc::new(CaseFiles::load(&config.case_dir)?);

    let store: Arc<dyn DocumentStore> = match config.store {
        StoreBackend::S3 => {
            let client = clerkship_storage::client::build_client().await;
            Arc::new(S3DocumentStore::connect(client, &config.bucket, &config.collection).await?)
        }
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory store; answers are lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let state =
        AppState::new(store, case, config.history_cap).with_session_idle(config.session_idle);
    let app = routes::router(state);

    if config.lambda {
        lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
    } else {
        let listener = tokio::net::TcpListener::bind(&config.bind).await?;
        tracing::info!(addr = %config.bind, "listening");
        axum::serve(listener, app).await?;
        Ok(())
    }
}
