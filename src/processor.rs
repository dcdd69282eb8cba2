//! Per-request face-swap orchestration
//!
//! One [`FaceSwapProcessor`] is built at startup and shared across requests;
//! each call to [`FaceSwapProcessor::process`] runs an independent pipeline:
//! fetch both inputs concurrently, validate their media kinds, assemble a
//! request-local engine configuration, invoke the engine and hand back the
//! output path. Both fetched temp files are owned by drop guards on the
//! pipeline's stack, so they are removed on every exit path: success,
//! typed failure, panic or cancellation.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Url;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::{SwapConfig, SwapConfigBuilder};
use crate::download::MediaFetcher;
use crate::engine::EngineInvoker;
use crate::error::{FaceSwapError, Result};
use crate::media::MediaKind;
use crate::probe::MediaProber;

/// Terminal result of a successful job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapJob {
    /// Path of the produced output artifact; ownership passes to the caller,
    /// the orchestrator never removes it
    pub output_path: PathBuf,
}

/// Request orchestrator composing fetcher, validator, configuration builder
/// and engine invoker
///
/// Cloning is cheap (shared handles only), which lets each request's
/// pipeline run in its own task.
#[derive(Clone)]
pub struct FaceSwapProcessor {
    fetcher: MediaFetcher,
    invoker: Arc<EngineInvoker>,
    prober: Arc<dyn MediaProber>,
    defaults: SwapConfigBuilder,
    output_dir: PathBuf,
}

impl FaceSwapProcessor {
    /// Create a processor writing output artifacts into `output_dir`
    ///
    /// The directory is created if it does not exist.
    ///
    /// # Errors
    /// - Failed to create the output directory
    pub fn new(
        fetcher: MediaFetcher,
        invoker: Arc<EngineInvoker>,
        prober: Arc<dyn MediaProber>,
        defaults: SwapConfigBuilder,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)
            .map_err(|e| FaceSwapError::file_io_error("create output directory", &output_dir, e))?;

        Ok(Self {
            fetcher,
            invoker,
            prober,
            defaults,
            output_dir,
        })
    }

    /// Run one face-swap job
    ///
    /// The pipeline body runs in a spawned task: if the calling transport
    /// drops this future (client disconnect, timeout), the pipeline and any
    /// in-flight engine invocation still settle, their result is discarded
    /// and the temp input guards clean up when they do. A panicked pipeline
    /// is reported as an opaque internal failure.
    ///
    /// # Errors
    /// - `InvalidMedia` for unsupported or mismatched input kinds
    /// - `DownloadStatus` / `Network` / `FileIo` for fetch failures
    /// - `InvalidConfig` for configuration assembly failures
    /// - `EngineFailed` / `Engine` for engine failures
    /// - `Internal` for unexpected faults
    pub async fn process(&self, source_url: Url, target_url: Url) -> Result<SwapJob> {
        let this = self.clone();
        let pipeline = tokio::spawn(async move { this.run_pipeline(source_url, target_url).await });

        match pipeline.await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "face swap pipeline task did not complete");
                Err(FaceSwapError::internal("face swap processing failed"))
            },
        }
    }

    #[instrument(skip(self), fields(source = %source_url, target = %target_url))]
    async fn run_pipeline(&self, source_url: Url, target_url: Url) -> Result<SwapJob> {
        // Both fetches run concurrently and both must resolve before
        // validation. Guards for whichever fetches succeeded are dropped on
        // the error paths below, removing their files.
        let (source, target) = tokio::join!(
            self.fetcher.fetch(&source_url),
            self.fetcher.fetch(&target_url)
        );
        let source = source?;
        let target = target?;

        if source.kind() != MediaKind::Image {
            return Err(FaceSwapError::invalid_media(
                "source must be an image",
            ));
        }
        // Targets may be image or video; the fetch allow-list already
        // excluded everything else.

        let output_path = self.output_path_for(target.path());
        let config = SwapConfig::for_job(
            self.defaults.clone(),
            source.path(),
            target.path(),
            target.kind(),
            output_path,
            self.prober.as_ref(),
        )
        .await?;

        self.invoker.invoke(&config).await?;

        info!(output = %config.output_path.display(), "face swap completed");
        Ok(SwapJob {
            output_path: config.output_path,
        })
        // source and target guards drop here on success, and on every error
        // path above, removing the temp inputs.
    }

    /// Unique output path preserving the target's extension
    fn output_path_for(&self, target_path: &std::path::Path) -> PathBuf {
        let ext = target_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("mp4");
        self.output_dir.join(format!("{}.{ext}", Uuid::new_v4()))
    }
}
