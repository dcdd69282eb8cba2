#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! # Face Swap Orchestration Service
//!
//! A request-scoped orchestration pipeline around an external face-swap
//! engine: fetch two untrusted remote media inputs concurrently, validate
//! them against extension allow-lists, assemble the engine's full parameter
//! set per request, invoke the engine and hand back the produced artifact,
//! with temp inputs guaranteed to be removed on every exit path.
//!
//! The engine itself (model loading, inference, encoding) is an opaque
//! external capability behind the [`SwapEngine`] trait; the default
//! [`ProcessEngine`] drives a headless engine executable per job.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use faceswap_service::{
//!     AllowListPolicy, EngineInvoker, FaceSwapProcessor, FfprobeProber,
//!     MediaFetcher, ProcessEngine, SwapConfig,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let policy = Arc::new(AllowListPolicy::default());
//! let fetcher = MediaFetcher::new("temp", policy, 50 * 1024 * 1024)?;
//! let engine = Arc::new(ProcessEngine::new("facefusion"));
//!
//! let processor = Arc::new(FaceSwapProcessor::new(
//!     fetcher,
//!     Arc::new(EngineInvoker::new(engine)),
//!     Arc::new(FfprobeProber::default()),
//!     SwapConfig::builder(),
//!     "output",
//! )?);
//!
//! let job = processor
//!     .process(
//!         "https://cdn.example.com/face.jpg".parse()?,
//!         "https://cdn.example.com/clip.mp4".parse()?,
//!     )
//!     .await?;
//! println!("output: {}", job.output_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## HTTP surface
//!
//! [`server::router`] exposes the pipeline as `POST /api/face-swap` with a
//! `{source_url, target_url}` payload; [`server::serve`] hosts it with
//! graceful shutdown. Enable the `cli` feature (default) for the
//! `faceswap-service` binary.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod download;
pub mod engine;
pub mod error;
pub mod media;
pub mod probe;
pub mod processor;
pub mod server;

// Public API exports
pub use config::{
    FaceDetectorModel, FaceLandmarkerModel, FaceMaskType, FaceSelectorMode, FaceSelectorOrder,
    SwapConfig, SwapConfigBuilder, VideoMemoryStrategy,
};
pub use download::{MediaFetcher, TempMedia};
pub use engine::{EngineInvoker, ProcessEngine, SwapEngine};
pub use error::{FaceSwapError, Result};
pub use media::{AllowListPolicy, MediaKind};
pub use probe::{FfprobeProber, MediaProber, VideoMetadata};
pub use processor::{FaceSwapProcessor, SwapJob};
pub use server::{ErrorBody, SwapRequest, SwapResponse};
