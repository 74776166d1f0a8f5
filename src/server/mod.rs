//! Ephemeral artifact download server
//!
//! Serves the produced archive at `/download/:version/:file` on a freshly
//! probed local port. The listener is bound before the caller gets the
//! session back, so the download URL can be announced knowing the socket is
//! live. The session closes after a fixed window, or earlier via an explicit
//! shutdown; whichever trigger fires first wins and the release runs once.
//! A completed transfer does not close the server - it keeps serving until
//! the window expires.

use crate::errors::{PlantError, Result};
use axum::extract::{Path as RoutePath, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// How long the artifact stays downloadable
pub const DOWNLOAD_WINDOW: Duration = Duration::from_secs(300);

struct Served {
    artifact: PathBuf,
}

/// A live download listener owning the artifact path for its lifetime
#[derive(Debug)]
pub struct DownloadSession {
    port: u16,
    shutdown_tx: broadcast::Sender<()>,
    server: JoinHandle<()>,
}

impl DownloadSession {
    /// Bind a listener and start serving the artifact
    ///
    /// Uses the default five-minute window.
    pub async fn start(artifact: PathBuf) -> Result<Self> {
        Self::start_with_window(artifact, DOWNLOAD_WINDOW).await
    }

    /// Bind a listener with a custom serving window
    pub async fn start_with_window(artifact: PathBuf, window: Duration) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0))
            .await
            .map_err(PlantError::Io)?;
        let port = listener.local_addr().map_err(PlantError::Io)?.port();

        let state = Arc::new(Served { artifact });
        let app = Router::new()
            .route("/download/:version/:file", get(serve_artifact))
            .with_state(state);

        let (shutdown_tx, _) = broadcast::channel(4);

        let mut serve_rx = shutdown_tx.subscribe();
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = serve_rx.recv().await;
                })
                .await;
        });

        // Cancellable window timer: a shutdown from any trigger also cancels
        // the timer itself.
        let timer_tx = shutdown_tx.clone();
        let mut timer_rx = shutdown_tx.subscribe();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(window) => {
                    let _ = timer_tx.send(());
                }
                _ = timer_rx.recv() => {}
            }
        });

        Ok(Self {
            port,
            shutdown_tx,
            server,
        })
    }

    /// Port the listener is bound to
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Download URL for the artifact
    pub fn url(&self, version: &str, file: &str) -> String {
        format!("http://localhost:{}/download/{}/{}", self.port, version, file)
    }

    /// Release the listener early
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Wait until the listener has closed (window expiry or shutdown)
    pub async fn closed(self) {
        let _ = self.server.await;
    }
}

/// Serve the artifact bytes as a download.
///
/// The `:version`/`:file` path values are not validated against the actual
/// artifact name; any values serve the same file.
async fn serve_artifact(
    State(served): State<Arc<Served>>,
    RoutePath((_version, _file)): RoutePath<(String, String)>,
) -> Response {
    let name = served
        .artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact.tar.gz".to_string());

    match tokio::fs::read(&served.artifact).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/gzip".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", name),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "artifact not found").into_response(),
    }
}
