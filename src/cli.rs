//! Server frontend: argument parsing, tracing setup and bootstrap

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::SwapConfig;
use crate::download::MediaFetcher;
use crate::engine::{EngineInvoker, ProcessEngine};
use crate::media::AllowListPolicy;
use crate::probe::FfprobeProber;
use crate::processor::FaceSwapProcessor;
use crate::server;

/// Face swap orchestration service
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "faceswap-service")]
pub struct Cli {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Directory for downloaded temp inputs
    #[arg(long, default_value = "temp", value_name = "PATH")]
    pub temp_dir: PathBuf,

    /// Directory for produced output artifacts
    #[arg(long, default_value = "output", value_name = "PATH")]
    pub output_dir: PathBuf,

    /// Engine executable invoked once per job
    #[arg(long, default_value = "facefusion")]
    pub engine: String,

    /// Fixed argument prepended before the per-job engine configuration
    /// (repeatable, e.g. a script path when the engine is an interpreter)
    #[arg(long = "engine-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub engine_args: Vec<String>,

    /// Face swapper model passed to the engine
    #[arg(long, default_value = "inswapper_128_fp16")]
    pub swapper_model: String,

    /// Maximum accepted download size in megabytes
    #[arg(long, default_value_t = 50)]
    pub max_download_mb: u64,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse arguments, initialize tracing and run the service
///
/// # Errors
/// - Invalid bind address
/// - Temp or output directory cannot be created
/// - The server loop fails
pub async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let policy = Arc::new(AllowListPolicy::default());
    let fetcher = MediaFetcher::new(
        &cli.temp_dir,
        policy,
        cli.max_download_mb * 1024 * 1024,
    )?;

    let engine = ProcessEngine::new(&cli.engine).with_base_args(cli.engine_args.clone());
    let invoker = Arc::new(EngineInvoker::new(Arc::new(engine)));
    let defaults = SwapConfig::builder().face_swapper_model(&cli.swapper_model);

    let processor = Arc::new(FaceSwapProcessor::new(
        fetcher,
        invoker,
        Arc::new(FfprobeProber::default()),
        defaults,
        &cli.output_dir,
    )?);

    let host: IpAddr = cli
        .host
        .parse()
        .with_context(|| format!("invalid bind address: {}", cli.host))?;
    server::serve(SocketAddr::new(host, cli.port), processor).await
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "faceswap_service={level},tower_http={level}"
        ))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
