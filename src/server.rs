//! HTTP surface for the face-swap service
//!
//! Thin transport glue over [`FaceSwapProcessor`]: the payload contract and
//! the mapping from pipeline errors to response statuses live here, nothing
//! else does.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::error::FaceSwapError;
use crate::processor::FaceSwapProcessor;

/// Job submission payload
#[derive(Debug, Clone, Deserialize)]
pub struct SwapRequest {
    /// Absolute URL of the source face image
    pub source_url: String,
    /// Absolute URL of the target image or video
    pub target_url: String,
}

/// Success payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapResponse {
    /// Always true on the success path
    pub success: bool,
    /// Human-readable completion message
    pub message: String,
    /// Path of the produced output artifact
    pub output_path: String,
}

/// Failure payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure description
    pub detail: String,
}

/// Structured API error: a status code plus a `detail` body
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl From<FaceSwapError> for ApiError {
    fn from(err: FaceSwapError) -> Self {
        let status = if err.is_client_fault() {
            StatusCode::BAD_REQUEST
        } else {
            error!(error = %err, "face swap request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

/// Build the service router
#[must_use]
pub fn router(processor: Arc<FaceSwapProcessor>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/face-swap", post(face_swap))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(processor)
}

/// Bind and serve until ctrl-c or SIGTERM
///
/// # Errors
/// - The listener cannot be bound
/// - The server loop fails
pub async fn serve(addr: SocketAddr, processor: Arc<FaceSwapProcessor>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "face swap service listening");
    axum::serve(listener, router(processor))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => error!(error = %e, "failed to install SIGTERM handler"),
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutting down face swap service");
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn face_swap(
    State(processor): State<Arc<FaceSwapProcessor>>,
    Json(request): Json<SwapRequest>,
) -> Result<Json<SwapResponse>, ApiError> {
    let source_url = Url::parse(&request.source_url)
        .map_err(|e| ApiError::bad_request(format!("invalid source_url: {e}")))?;
    let target_url = Url::parse(&request.target_url)
        .map_err(|e| ApiError::bad_request(format!("invalid target_url: {e}")))?;

    let job = processor.process(source_url, target_url).await?;

    Ok(Json(SwapResponse {
        success: true,
        message: "Face swap completed successfully".to_string(),
        output_path: job.output_path.display().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SwapConfig;
    use crate::download::MediaFetcher;
    use crate::engine::{EngineInvoker, SwapEngine};
    use crate::error::Result;
    use crate::media::AllowListPolicy;
    use crate::probe::{MediaProber, VideoMetadata};
    use async_trait::async_trait;
    use std::path::Path;
    use tempfile::TempDir;

    struct NoopEngine;

    #[async_trait]
    impl SwapEngine for NoopEngine {
        async fn invoke(&self, config: &SwapConfig) -> Result<i32> {
            std::fs::write(&config.output_path, b"x").unwrap();
            Ok(0)
        }
    }

    struct NoopProber;

    #[async_trait]
    impl MediaProber for NoopProber {
        async fn probe(&self, _path: &Path) -> Result<VideoMetadata> {
            Ok(VideoMetadata {
                frame_count: 1,
                fps: 30.0,
                width: 1,
                height: 1,
            })
        }
    }

    async fn spawn_service(temp: &TempDir, out: &TempDir) -> SocketAddr {
        let fetcher = MediaFetcher::new(
            temp.path(),
            Arc::new(AllowListPolicy::default()),
            1024 * 1024,
        )
        .unwrap();
        let processor = Arc::new(
            FaceSwapProcessor::new(
                fetcher,
                Arc::new(EngineInvoker::new(Arc::new(NoopEngine))),
                Arc::new(NoopProber),
                SwapConfig::builder(),
                out.path(),
            )
            .unwrap(),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(processor)).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let temp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let addr = spawn_service(&temp, &out).await;

        let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn test_invalid_url_is_bad_request() {
        let temp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let addr = spawn_service(&temp, &out).await;

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/api/face-swap"))
            .json(&serde_json::json!({
                "source_url": "not a url",
                "target_url": "https://example.com/b.mp4",
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400);
        let body: ErrorBody = response.json().await.unwrap();
        assert!(body.detail.contains("source_url"));
    }

    #[tokio::test]
    async fn test_unsupported_media_is_bad_request() {
        let temp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let addr = spawn_service(&temp, &out).await;

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/api/face-swap"))
            .json(&serde_json::json!({
                "source_url": "https://192.0.2.1/a.txt",
                "target_url": "https://192.0.2.1/b.pdf",
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400);
        let body: ErrorBody = response.json().await.unwrap();
        assert!(body.detail.contains("unsupported media type"));
    }
}
