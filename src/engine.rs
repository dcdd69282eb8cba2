//! External engine invocation
//!
//! The face-swap engine is consumed as an opaque capability: given a fully
//! populated [`SwapConfig`], produce the output file and report an integer
//! completion signal. [`EngineInvoker`] interprets that signal and verifies
//! the output actually exists; it never retries, since invocations are
//! assumed expensive and non-idempotent.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::SwapConfig;
use crate::error::{FaceSwapError, Result};

/// Capability interface for the external face-swap engine
#[async_trait]
pub trait SwapEngine: Send + Sync {
    /// Run one job described by `config` and return the engine's integer
    /// completion signal (0 = success)
    ///
    /// # Errors
    /// - The engine could not be started at all
    async fn invoke(&self, config: &SwapConfig) -> Result<i32>;

    /// Whether this engine keeps process-wide mutable state
    ///
    /// Exclusive engines must never see two configurations at once, so the
    /// invoker serializes their invocations.
    fn exclusive(&self) -> bool {
        false
    }
}

/// [`SwapEngine`] backed by an external headless engine process
///
/// The whole configuration travels as the argument vector of each spawn, so
/// concurrent invocations cannot contaminate each other and the engine is
/// not exclusive.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    command: String,
    base_args: Vec<String>,
}

impl ProcessEngine {
    /// Create an engine invoking the given executable
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            base_args: Vec::new(),
        }
    }

    /// Prepend fixed arguments before the per-job configuration
    /// (e.g. a script path when the command is an interpreter)
    #[must_use]
    pub fn with_base_args(mut self, args: Vec<String>) -> Self {
        self.base_args = args;
        self
    }
}

#[async_trait]
impl SwapEngine for ProcessEngine {
    async fn invoke(&self, config: &SwapConfig) -> Result<i32> {
        let args = config.to_engine_args();
        debug!(command = %self.command, "spawning engine process");

        // kill_on_drop stays off: an in-flight job that lost its caller is
        // allowed to settle, the pipeline discards its result afterwards.
        let status = Command::new(&self.command)
            .args(&self.base_args)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(false)
            .status()
            .await
            .map_err(|e| FaceSwapError::engine(format!("failed to spawn engine process: {e}")))?;

        // A signal-terminated process has no code; surface it as a failure code.
        Ok(status.code().unwrap_or(-1))
    }
}

/// Invokes the engine and interprets its completion signal
pub struct EngineInvoker {
    engine: Arc<dyn SwapEngine>,
    gate: Option<Mutex<()>>,
}

impl EngineInvoker {
    /// Wrap an engine, serializing invocations when it declares itself
    /// exclusive
    #[must_use]
    pub fn new(engine: Arc<dyn SwapEngine>) -> Self {
        let gate = engine.exclusive().then(|| Mutex::new(()));
        Self { engine, gate }
    }

    /// Run one job and verify its output
    ///
    /// A zero completion signal without a file at the declared output path
    /// is treated as a failure: an engine that spuriously reports success
    /// must not produce a success response.
    ///
    /// # Errors
    /// - `EngineFailed` for a non-zero completion signal (not retried)
    /// - `Engine` when the engine could not run or produced no output
    pub async fn invoke(&self, config: &SwapConfig) -> Result<()> {
        let _guard = match &self.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        };

        let code = self.engine.invoke(config).await?;
        if code != 0 {
            return Err(FaceSwapError::EngineFailed(code));
        }

        if !config.output_path.exists() {
            return Err(FaceSwapError::engine(format!(
                "engine reported success but produced no output at {}",
                config.output_path.display()
            )));
        }

        info!(output = %config.output_path.display(), "engine run complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    struct FakeEngine {
        code: i32,
        write_output: bool,
    }

    #[async_trait]
    impl SwapEngine for FakeEngine {
        async fn invoke(&self, config: &SwapConfig) -> Result<i32> {
            if self.write_output {
                std::fs::write(&config.output_path, b"artifact").unwrap();
            }
            Ok(self.code)
        }
    }

    struct OverlapTracker {
        current: AtomicUsize,
        max_seen: AtomicUsize,
        exclusive: bool,
    }

    #[async_trait]
    impl SwapEngine for OverlapTracker {
        async fn invoke(&self, config: &SwapConfig) -> Result<i32> {
            let current = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_seen.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            std::fs::write(&config.output_path, b"x").unwrap();
            Ok(0)
        }

        fn exclusive(&self) -> bool {
            self.exclusive
        }
    }

    fn job_config(output: PathBuf) -> SwapConfig {
        SwapConfig::builder()
            .build(
                PathBuf::from("/tmp/src.jpg"),
                PathBuf::from("/tmp/tgt.mp4"),
                output,
            )
            .unwrap()
    }

    #[tokio::test]
    async fn test_successful_invocation_with_output() {
        let dir = TempDir::new().unwrap();
        let config = job_config(dir.path().join("out.mp4"));

        let invoker = EngineInvoker::new(Arc::new(FakeEngine {
            code: 0,
            write_output: true,
        }));
        invoker.invoke(&config).await.unwrap();
        assert!(config.output_path.exists());
    }

    #[tokio::test]
    async fn test_nonzero_code_is_failure() {
        let dir = TempDir::new().unwrap();
        let config = job_config(dir.path().join("out.mp4"));

        let invoker = EngineInvoker::new(Arc::new(FakeEngine {
            code: 3,
            write_output: true,
        }));
        let result = invoker.invoke(&config).await;
        assert!(matches!(result, Err(FaceSwapError::EngineFailed(3))));
    }

    #[tokio::test]
    async fn test_spurious_success_without_output_is_failure() {
        let dir = TempDir::new().unwrap();
        let config = job_config(dir.path().join("out.mp4"));

        let invoker = EngineInvoker::new(Arc::new(FakeEngine {
            code: 0,
            write_output: false,
        }));
        let result = invoker.invoke(&config).await;
        assert!(matches!(result, Err(FaceSwapError::Engine(_))));
        assert!(!config.output_path.exists());
    }

    #[tokio::test]
    async fn test_exclusive_engine_is_serialized() {
        let dir = TempDir::new().unwrap();
        let engine = Arc::new(OverlapTracker {
            current: AtomicUsize::new(0),
            max_seen: AtomicUsize::new(0),
            exclusive: true,
        });
        let invoker = Arc::new(EngineInvoker::new(engine.clone()));

        let mut handles = Vec::new();
        for i in 0..4 {
            let invoker = Arc::clone(&invoker);
            let config = job_config(dir.path().join(format!("out-{i}.mp4")));
            handles.push(tokio::spawn(async move { invoker.invoke(&config).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(engine.max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_exclusive_engine_runs_concurrently() {
        let dir = TempDir::new().unwrap();
        let engine = Arc::new(OverlapTracker {
            current: AtomicUsize::new(0),
            max_seen: AtomicUsize::new(0),
            exclusive: false,
        });
        let invoker = Arc::new(EngineInvoker::new(engine.clone()));

        let mut handles = Vec::new();
        for i in 0..4 {
            let invoker = Arc::clone(&invoker);
            let config = job_config(dir.path().join(format!("out-{i}.mp4")));
            handles.push(tokio::spawn(async move { invoker.invoke(&config).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(engine.max_seen.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn test_process_engine_spawn_failure() {
        let dir = TempDir::new().unwrap();
        let config = job_config(dir.path().join("out.mp4"));

        let engine = ProcessEngine::new("/nonexistent/engine-binary");
        let result = engine.invoke(&config).await;
        assert!(matches!(result, Err(FaceSwapError::Engine(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_engine_reports_exit_code() {
        let dir = TempDir::new().unwrap();
        let config = job_config(dir.path().join("out.mp4"));

        // `false` ignores its arguments and exits 1.
        let engine = ProcessEngine::new("false");
        let code = engine.invoke(&config).await.unwrap();
        assert_eq!(code, 1);
    }
}
