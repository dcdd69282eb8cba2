//! Media metadata probing via ffprobe
//!
//! The configuration builder needs the target video's total frame count to
//! derive the trim-end frame. Probing sits behind the [`MediaProber`] trait
//! so the pipeline can be exercised with a fake in tests.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::error::{FaceSwapError, Result};

/// Metadata extracted from a video's primary video stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoMetadata {
    /// Total number of frames in the stream
    pub frame_count: u64,
    /// Frames per second
    pub fps: f64,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

/// Capability to probe metadata from a local media file
#[async_trait]
pub trait MediaProber: Send + Sync {
    /// Probe the primary video stream of the file at `path`
    ///
    /// # Errors
    /// - The file has no video stream
    /// - The probing tool is unavailable or reports failure
    /// - Probe output cannot be parsed
    async fn probe(&self, path: &Path) -> Result<VideoMetadata>;
}

/// [`MediaProber`] backed by the `ffprobe` executable
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    command: String,
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self {
            command: "ffprobe".to_string(),
        }
    }
}

impl FfprobeProber {
    /// Create a prober that invokes a specific ffprobe executable
    #[must_use]
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    async fn probe(&self, path: &Path) -> Result<VideoMetadata> {
        if !path.exists() {
            return Err(FaceSwapError::probe(format!(
                "file not found: {}",
                path.display()
            )));
        }

        let output = Command::new(&self.command)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-count_packets",
                "-show_entries",
                "stream=nb_frames,nb_read_packets,r_frame_rate,width,height",
                "-show_entries",
                "format=duration",
                "-print_format",
                "json",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| FaceSwapError::probe(format!("failed to run ffprobe: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FaceSwapError::probe(format!(
                "ffprobe failed for {}: {}",
                path.display(),
                stderr.trim()
            )));
        }

        let json = String::from_utf8_lossy(&output.stdout);
        let metadata = parse_ffprobe_output(&json)?;
        debug!(
            path = %path.display(),
            frames = metadata.frame_count,
            fps = metadata.fps,
            "probed video metadata"
        );
        Ok(metadata)
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    streams: Option<Vec<FfprobeStream>>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    nb_frames: Option<String>,
    nb_read_packets: Option<String>,
    r_frame_rate: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Parse ffprobe JSON output into [`VideoMetadata`]
///
/// Frame count resolution order: `nb_frames`, then `nb_read_packets`
/// (containers that do not carry a frame count), then `duration * fps`.
fn parse_ffprobe_output(json: &str) -> Result<VideoMetadata> {
    let output: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| FaceSwapError::probe(format!("failed to parse ffprobe output: {e}")))?;

    let stream = output
        .streams
        .and_then(|mut s| if s.is_empty() { None } else { Some(s.remove(0)) })
        .ok_or_else(|| FaceSwapError::probe("no video stream found"))?;

    let fps = stream
        .r_frame_rate
        .as_deref()
        .map_or(30.0, parse_frame_rate);

    let counted = stream
        .nb_frames
        .as_deref()
        .and_then(|s| s.parse::<u64>().ok())
        .or_else(|| {
            stream
                .nb_read_packets
                .as_deref()
                .and_then(|s| s.parse::<u64>().ok())
        });

    let frame_count = match counted {
        Some(n) if n > 0 => n,
        _ => {
            let duration: f64 = output
                .format
                .and_then(|f| f.duration)
                .and_then(|d| d.parse().ok())
                .ok_or_else(|| FaceSwapError::probe("cannot determine frame count"))?;
            (duration * fps).round() as u64
        },
    };

    Ok(VideoMetadata {
        frame_count,
        fps,
        width: stream.width.unwrap_or(0),
        height: stream.height.unwrap_or(0),
    })
}

/// Parse an ffprobe rational frame rate string such as "30/1" or "30000/1001"
fn parse_frame_rate(fps: &str) -> f64 {
    let mut parts = fps.split('/');
    let num: f64 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(30.0);
    let den: f64 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(1.0);
    if den > 0.0 {
        num / den
    } else {
        30.0
    }
}
