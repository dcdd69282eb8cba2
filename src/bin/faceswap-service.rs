//! Face Swap Orchestration Service
//!
//! HTTP service wrapping the faceswap-service library: accepts source and
//! target media URLs, runs the external face-swap engine and returns the
//! produced artifact path.

#[cfg(feature = "cli")]
use faceswap_service::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
