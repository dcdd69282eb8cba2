//! Engine configuration assembly
//!
//! One [`SwapConfig`] is built per request and is immutable after
//! construction. It is never shared across requests: the whole parameter set
//! travels with the invocation instead of living in a process-wide store.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FaceSwapError, Result};
use crate::media::MediaKind;
use crate::probe::MediaProber;

/// Face detector model options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceDetectorModel {
    /// Run every detector and merge results
    Many,
    /// RetinaFace detector
    Retinaface,
    /// SCRFD detector
    Scrfd,
    /// YOLO-face detector
    Yoloface,
}

impl std::fmt::Display for FaceDetectorModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Many => write!(f, "many"),
            Self::Retinaface => write!(f, "retinaface"),
            Self::Scrfd => write!(f, "scrfd"),
            Self::Yoloface => write!(f, "yoloface"),
        }
    }
}

/// Face selector mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceSelectorMode {
    /// Swap every detected face
    Many,
    /// Swap a single face
    One,
    /// Swap faces matching the reference face
    Reference,
}

impl std::fmt::Display for FaceSelectorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Many => write!(f, "many"),
            Self::One => write!(f, "one"),
            Self::Reference => write!(f, "reference"),
        }
    }
}

/// Ordering applied to detected faces before selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceSelectorOrder {
    /// Left to right by bounding box
    LeftRight,
    /// Right to left by bounding box
    RightLeft,
    /// Top to bottom by bounding box
    TopBottom,
    /// Bottom to top by bounding box
    BottomTop,
    /// Smallest to largest face
    SmallLarge,
    /// Largest to smallest face
    LargeSmall,
    /// Best to worst detector score
    BestWorst,
    /// Worst to best detector score
    WorstBest,
}

impl std::fmt::Display for FaceSelectorOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LeftRight => write!(f, "left-right"),
            Self::RightLeft => write!(f, "right-left"),
            Self::TopBottom => write!(f, "top-bottom"),
            Self::BottomTop => write!(f, "bottom-top"),
            Self::SmallLarge => write!(f, "small-large"),
            Self::LargeSmall => write!(f, "large-small"),
            Self::BestWorst => write!(f, "best-worst"),
            Self::WorstBest => write!(f, "worst-best"),
        }
    }
}

/// Face landmarker model options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceLandmarkerModel {
    /// Run every landmarker and merge results
    Many,
    /// 2DFAN4 landmarker
    TwoDFan4,
    /// Peppa-Wutz landmarker
    PeppaWutz,
}

impl std::fmt::Display for FaceLandmarkerModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Many => write!(f, "many"),
            Self::TwoDFan4 => write!(f, "2dfan4"),
            Self::PeppaWutz => write!(f, "peppa_wutz"),
        }
    }
}

/// Face mask type options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceMaskType {
    /// Rectangular bounding box mask
    Box,
    /// Occlusion-aware mask
    Occlusion,
    /// Face region segmentation mask
    Region,
}

impl std::fmt::Display for FaceMaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Box => write!(f, "box"),
            Self::Occlusion => write!(f, "occlusion"),
            Self::Region => write!(f, "region"),
        }
    }
}

/// Video memory strategy for the engine's GPU usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoMemoryStrategy {
    /// Free memory aggressively
    Strict,
    /// Balance memory and throughput
    Moderate,
    /// Keep everything resident
    Tolerant,
}

impl std::fmt::Display for VideoMemoryStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Moderate => write!(f, "moderate"),
            Self::Tolerant => write!(f, "tolerant"),
        }
    }
}

/// Complete parameter set consumed by the external engine for one job
///
/// Every parameter has either a request-derived value or a documented
/// default. Construct through [`SwapConfigBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapConfig {
    /// Validated local path of the source face image
    pub source_path: PathBuf,
    /// Validated local path of the target image or video
    pub target_path: PathBuf,
    /// Path the engine must produce the output artifact at
    pub output_path: PathBuf,

    /// Face detector model
    pub face_detector_model: FaceDetectorModel,
    /// Face detector input size, `WIDTHxHEIGHT`
    pub face_detector_size: String,
    /// Face detector score threshold, (0, 1]
    pub face_detector_score: f32,
    /// Rotation angles (degrees) the detector is applied at
    pub face_detector_angles: Vec<u16>,

    /// Face selector mode
    pub face_selector_mode: FaceSelectorMode,
    /// Face selector ordering
    pub face_selector_order: FaceSelectorOrder,
    /// Index of the reference face within the ordered detection list
    pub reference_face_position: u32,
    /// Maximum embedding distance for reference matching
    pub reference_face_distance: f32,
    /// Frame number the reference face is taken from
    pub reference_frame_number: u32,

    /// Face landmarker model
    pub face_landmarker_model: FaceLandmarkerModel,
    /// Face landmarker score threshold, [0, 1]
    pub face_landmarker_score: f32,

    /// Mask types applied to the swapped region
    pub face_mask_types: Vec<FaceMaskType>,
    /// Mask edge blur, [0, 1]
    pub face_mask_blur: f32,
    /// Mask padding (top, right, bottom, left)
    pub face_mask_padding: (u16, u16, u16, u16),

    /// Processor chain the engine runs
    pub processors: Vec<String>,
    /// Face swapper model name
    pub face_swapper_model: String,
    /// Swapper pixel boost resolution, `WIDTHxHEIGHT`
    pub face_swapper_pixel_boost: String,

    /// Output video encoder
    pub output_video_encoder: String,
    /// Output video quality, 0-100
    pub output_video_quality: u8,
    /// Output video encoder preset
    pub output_video_preset: String,
    /// Output video frame rate
    pub output_video_fps: f64,
    /// Output video resolution, `WIDTHxHEIGHT`
    pub output_video_resolution: String,
    /// Output image resolution, `WIDTHxHEIGHT`
    pub output_image_resolution: String,
    /// Output audio encoder
    pub output_audio_encoder: String,

    /// First frame to process
    pub trim_frame_start: u64,
    /// Last frame to process; equals the target's frame count for videos,
    /// 0 (absent) for still images
    pub trim_frame_end: u64,

    /// Execution providers, in preference order
    pub execution_providers: Vec<String>,
    /// Execution device id
    pub execution_device_id: String,
    /// Engine worker thread count
    pub execution_thread_count: u32,
    /// Engine per-thread queue depth
    pub execution_queue_count: u32,
    /// GPU memory strategy
    pub video_memory_strategy: VideoMemoryStrategy,

    /// Directory for the engine's own intermediate frames
    pub temp_path: PathBuf,
    /// Intermediate frame image format
    pub temp_frame_format: String,
    /// Keep the engine's intermediate frames after the run
    pub keep_temp: bool,

    /// Skip muxing the audio track into the output
    pub skip_audio: bool,

    /// Model download providers available to the engine
    pub download_providers: Vec<String>,
    /// Model download scope
    pub download_scope: String,
}

impl SwapConfig {
    /// Create a builder carrying the canonical defaults
    #[must_use]
    pub fn builder() -> SwapConfigBuilder {
        SwapConfigBuilder::new()
    }

    /// Assemble the configuration for one job
    ///
    /// Applies the given defaults to the resolved input and output paths and
    /// derives the trim-end frame: for a video target it equals the probed
    /// total frame count, for a still image it stays 0 (absent). Aside from
    /// the probe read this performs no I/O and never invokes the engine.
    ///
    /// # Errors
    /// - Probing the target video fails
    /// - The assembled parameter set fails validation
    pub async fn for_job(
        defaults: SwapConfigBuilder,
        source_path: &Path,
        target_path: &Path,
        target_kind: MediaKind,
        output_path: PathBuf,
        prober: &dyn MediaProber,
    ) -> Result<Self> {
        let trim_frame_end = match target_kind {
            MediaKind::Video => prober.probe(target_path).await?.frame_count,
            MediaKind::Image => 0,
        };

        defaults
            .trim_frame_end(trim_frame_end)
            .build(source_path.to_path_buf(), target_path.to_path_buf(), output_path)
    }

    /// Render the parameter set as a deterministic headless-run argument
    /// vector for a subprocess engine
    #[must_use]
    pub fn to_engine_args(&self) -> Vec<String> {
        let mut args = vec![
            "headless-run".to_string(),
            "--source-paths".to_string(),
            self.source_path.display().to_string(),
            "--target-path".to_string(),
            self.target_path.display().to_string(),
            "--output-path".to_string(),
            self.output_path.display().to_string(),
            "--processors".to_string(),
        ];
        args.extend(self.processors.iter().cloned());

        args.extend([
            "--face-detector-model".to_string(),
            self.face_detector_model.to_string(),
            "--face-detector-size".to_string(),
            self.face_detector_size.clone(),
            "--face-detector-score".to_string(),
            self.face_detector_score.to_string(),
            "--face-detector-angles".to_string(),
        ]);
        args.extend(self.face_detector_angles.iter().map(ToString::to_string));

        args.extend([
            "--face-selector-mode".to_string(),
            self.face_selector_mode.to_string(),
            "--face-selector-order".to_string(),
            self.face_selector_order.to_string(),
            "--reference-face-position".to_string(),
            self.reference_face_position.to_string(),
            "--reference-face-distance".to_string(),
            self.reference_face_distance.to_string(),
            "--reference-frame-number".to_string(),
            self.reference_frame_number.to_string(),
            "--face-landmarker-model".to_string(),
            self.face_landmarker_model.to_string(),
            "--face-landmarker-score".to_string(),
            self.face_landmarker_score.to_string(),
            "--face-mask-types".to_string(),
        ]);
        args.extend(self.face_mask_types.iter().map(ToString::to_string));

        let (top, right, bottom, left) = self.face_mask_padding;
        args.extend([
            "--face-mask-blur".to_string(),
            self.face_mask_blur.to_string(),
            "--face-mask-padding".to_string(),
            top.to_string(),
            right.to_string(),
            bottom.to_string(),
            left.to_string(),
            "--face-swapper-model".to_string(),
            self.face_swapper_model.clone(),
            "--face-swapper-pixel-boost".to_string(),
            self.face_swapper_pixel_boost.clone(),
            "--output-video-encoder".to_string(),
            self.output_video_encoder.clone(),
            "--output-video-quality".to_string(),
            self.output_video_quality.to_string(),
            "--output-video-preset".to_string(),
            self.output_video_preset.clone(),
            "--output-video-fps".to_string(),
            self.output_video_fps.to_string(),
            "--output-video-resolution".to_string(),
            self.output_video_resolution.clone(),
            "--output-image-resolution".to_string(),
            self.output_image_resolution.clone(),
            "--output-audio-encoder".to_string(),
            self.output_audio_encoder.clone(),
            "--trim-frame-start".to_string(),
            self.trim_frame_start.to_string(),
            "--trim-frame-end".to_string(),
            self.trim_frame_end.to_string(),
            "--execution-providers".to_string(),
        ]);
        args.extend(self.execution_providers.iter().cloned());

        args.extend([
            "--execution-device-id".to_string(),
            self.execution_device_id.clone(),
            "--execution-thread-count".to_string(),
            self.execution_thread_count.to_string(),
            "--execution-queue-count".to_string(),
            self.execution_queue_count.to_string(),
            "--video-memory-strategy".to_string(),
            self.video_memory_strategy.to_string(),
            "--temp-path".to_string(),
            self.temp_path.display().to_string(),
            "--temp-frame-format".to_string(),
            self.temp_frame_format.clone(),
            "--download-providers".to_string(),
        ]);
        args.extend(self.download_providers.iter().cloned());
        args.extend([
            "--download-scope".to_string(),
            self.download_scope.clone(),
        ]);

        if self.skip_audio {
            args.push("--skip-audio".to_string());
        }
        if self.keep_temp {
            args.push("--keep-temp".to_string());
        }

        args
    }
}

/// Builder for [`SwapConfig`] carrying the canonical defaults
///
/// A clone of one shared builder is specialized per request, so defaults
/// configured at startup never leak mutations between concurrent jobs.
#[derive(Debug, Clone)]
pub struct SwapConfigBuilder {
    face_detector_model: FaceDetectorModel,
    face_detector_size: String,
    face_detector_score: f32,
    face_detector_angles: Vec<u16>,
    face_selector_mode: FaceSelectorMode,
    face_selector_order: FaceSelectorOrder,
    reference_face_position: u32,
    reference_face_distance: f32,
    reference_frame_number: u32,
    face_landmarker_model: FaceLandmarkerModel,
    face_landmarker_score: f32,
    face_mask_types: Vec<FaceMaskType>,
    face_mask_blur: f32,
    face_mask_padding: (u16, u16, u16, u16),
    processors: Vec<String>,
    face_swapper_model: String,
    face_swapper_pixel_boost: String,
    output_video_encoder: String,
    output_video_quality: u8,
    output_video_preset: String,
    output_video_fps: f64,
    output_video_resolution: String,
    output_image_resolution: String,
    output_audio_encoder: String,
    trim_frame_start: u64,
    trim_frame_end: u64,
    execution_providers: Vec<String>,
    execution_device_id: String,
    execution_thread_count: u32,
    execution_queue_count: u32,
    video_memory_strategy: VideoMemoryStrategy,
    temp_path: PathBuf,
    temp_frame_format: String,
    keep_temp: bool,
    skip_audio: bool,
    download_providers: Vec<String>,
    download_scope: String,
}

impl Default for SwapConfigBuilder {
    fn default() -> Self {
        Self {
            face_detector_model: FaceDetectorModel::Yoloface,
            face_detector_size: "640x640".to_string(),
            face_detector_score: 0.5,
            face_detector_angles: vec![0],
            face_selector_mode: FaceSelectorMode::Reference,
            face_selector_order: FaceSelectorOrder::LeftRight,
            reference_face_position: 0,
            reference_face_distance: 0.6,
            reference_frame_number: 0,
            face_landmarker_model: FaceLandmarkerModel::TwoDFan4,
            face_landmarker_score: 0.5,
            face_mask_types: vec![FaceMaskType::Box],
            face_mask_blur: 0.3,
            face_mask_padding: (0, 0, 0, 0),
            processors: vec!["face_swapper".to_string()],
            face_swapper_model: "inswapper_128_fp16".to_string(),
            face_swapper_pixel_boost: "128x128".to_string(),
            output_video_encoder: "libx264".to_string(),
            output_video_quality: 80,
            output_video_preset: "medium".to_string(),
            output_video_fps: 30.0,
            output_video_resolution: "1920x1080".to_string(),
            output_image_resolution: "1920x1080".to_string(),
            output_audio_encoder: "aac".to_string(),
            trim_frame_start: 0,
            trim_frame_end: 0,
            execution_providers: vec!["cuda".to_string()],
            execution_device_id: "0".to_string(),
            execution_thread_count: 4,
            execution_queue_count: 1,
            video_memory_strategy: VideoMemoryStrategy::Moderate,
            temp_path: PathBuf::from("temp"),
            temp_frame_format: "jpg".to_string(),
            keep_temp: false,
            skip_audio: false,
            download_providers: vec!["github".to_string(), "huggingface".to_string()],
            download_scope: "full".to_string(),
        }
    }
}

impl SwapConfigBuilder {
    /// Create a builder with the canonical defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the face detector model
    #[must_use]
    pub fn face_detector_model(mut self, model: FaceDetectorModel) -> Self {
        self.face_detector_model = model;
        self
    }

    /// Set the face detector input size (`WIDTHxHEIGHT`)
    #[must_use]
    pub fn face_detector_size(mut self, size: impl Into<String>) -> Self {
        self.face_detector_size = size.into();
        self
    }

    /// Set the face detector score threshold
    #[must_use]
    pub fn face_detector_score(mut self, score: f32) -> Self {
        self.face_detector_score = score;
        self
    }

    /// Set the face selector mode
    #[must_use]
    pub fn face_selector_mode(mut self, mode: FaceSelectorMode) -> Self {
        self.face_selector_mode = mode;
        self
    }

    /// Set the face selector ordering
    #[must_use]
    pub fn face_selector_order(mut self, order: FaceSelectorOrder) -> Self {
        self.face_selector_order = order;
        self
    }

    /// Set the face landmarker model
    #[must_use]
    pub fn face_landmarker_model(mut self, model: FaceLandmarkerModel) -> Self {
        self.face_landmarker_model = model;
        self
    }

    /// Set the face landmarker score threshold
    #[must_use]
    pub fn face_landmarker_score(mut self, score: f32) -> Self {
        self.face_landmarker_score = score;
        self
    }

    /// Set the mask types
    #[must_use]
    pub fn face_mask_types(mut self, types: Vec<FaceMaskType>) -> Self {
        self.face_mask_types = types;
        self
    }

    /// Set the mask edge blur
    #[must_use]
    pub fn face_mask_blur(mut self, blur: f32) -> Self {
        self.face_mask_blur = blur;
        self
    }

    /// Set the mask padding (top, right, bottom, left)
    #[must_use]
    pub fn face_mask_padding(mut self, padding: (u16, u16, u16, u16)) -> Self {
        self.face_mask_padding = padding;
        self
    }

    /// Set the face swapper model
    #[must_use]
    pub fn face_swapper_model(mut self, model: impl Into<String>) -> Self {
        self.face_swapper_model = model.into();
        self
    }

    /// Set the swapper pixel boost resolution (`WIDTHxHEIGHT`)
    #[must_use]
    pub fn face_swapper_pixel_boost(mut self, boost: impl Into<String>) -> Self {
        self.face_swapper_pixel_boost = boost.into();
        self
    }

    /// Set the output video encoder
    #[must_use]
    pub fn output_video_encoder(mut self, encoder: impl Into<String>) -> Self {
        self.output_video_encoder = encoder.into();
        self
    }

    /// Set the output video quality (0-100)
    #[must_use]
    pub fn output_video_quality(mut self, quality: u8) -> Self {
        self.output_video_quality = quality;
        self
    }

    /// Set the output video encoder preset
    #[must_use]
    pub fn output_video_preset(mut self, preset: impl Into<String>) -> Self {
        self.output_video_preset = preset.into();
        self
    }

    /// Set the output video frame rate
    #[must_use]
    pub fn output_video_fps(mut self, fps: f64) -> Self {
        self.output_video_fps = fps;
        self
    }

    /// Set the output video resolution (`WIDTHxHEIGHT`)
    #[must_use]
    pub fn output_video_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.output_video_resolution = resolution.into();
        self
    }

    /// Set the output audio encoder
    #[must_use]
    pub fn output_audio_encoder(mut self, encoder: impl Into<String>) -> Self {
        self.output_audio_encoder = encoder.into();
        self
    }

    /// Set the first frame to process
    #[must_use]
    pub fn trim_frame_start(mut self, frame: u64) -> Self {
        self.trim_frame_start = frame;
        self
    }

    /// Set the last frame to process (0 = absent)
    #[must_use]
    pub fn trim_frame_end(mut self, frame: u64) -> Self {
        self.trim_frame_end = frame;
        self
    }

    /// Set the execution providers, in preference order
    #[must_use]
    pub fn execution_providers(mut self, providers: Vec<String>) -> Self {
        self.execution_providers = providers;
        self
    }

    /// Set the engine worker thread count
    #[must_use]
    pub fn execution_thread_count(mut self, count: u32) -> Self {
        self.execution_thread_count = count;
        self
    }

    /// Set the GPU memory strategy
    #[must_use]
    pub fn video_memory_strategy(mut self, strategy: VideoMemoryStrategy) -> Self {
        self.video_memory_strategy = strategy;
        self
    }

    /// Set the engine's own temp directory
    #[must_use]
    pub fn temp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.temp_path = path.into();
        self
    }

    /// Skip muxing the audio track into the output
    #[must_use]
    pub fn skip_audio(mut self, skip: bool) -> Self {
        self.skip_audio = skip;
        self
    }

    /// Keep the engine's intermediate frames after the run
    #[must_use]
    pub fn keep_temp(mut self, keep: bool) -> Self {
        self.keep_temp = keep;
        self
    }

    /// Build the configuration for the given job paths
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for:
    /// - Score thresholds outside their valid ranges
    /// - Malformed `WIDTHxHEIGHT` resolution strings
    /// - An empty swapper model or processor chain
    /// - A non-positive frame rate or thread count
    pub fn build(
        self,
        source_path: PathBuf,
        target_path: PathBuf,
        output_path: PathBuf,
    ) -> Result<SwapConfig> {
        if !(self.face_detector_score > 0.0 && self.face_detector_score <= 1.0) {
            return Err(FaceSwapError::invalid_config(
                "face detector score must be in (0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.face_landmarker_score) {
            return Err(FaceSwapError::invalid_config(
                "face landmarker score must be in [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.face_mask_blur) {
            return Err(FaceSwapError::invalid_config(
                "face mask blur must be in [0, 1]",
            ));
        }
        if self.output_video_quality > 100 {
            return Err(FaceSwapError::invalid_config(
                "output video quality must be 0-100",
            ));
        }
        if self.output_video_fps <= 0.0 {
            return Err(FaceSwapError::invalid_config(
                "output video fps must be positive",
            ));
        }
        if self.face_swapper_model.is_empty() {
            return Err(FaceSwapError::invalid_config("face swapper model is empty"));
        }
        if self.processors.is_empty() {
            return Err(FaceSwapError::invalid_config("processor chain is empty"));
        }
        if self.execution_thread_count == 0 {
            return Err(FaceSwapError::invalid_config(
                "execution thread count must be at least 1",
            ));
        }
        for (name, value) in [
            ("face detector size", &self.face_detector_size),
            ("pixel boost", &self.face_swapper_pixel_boost),
            ("output video resolution", &self.output_video_resolution),
            ("output image resolution", &self.output_image_resolution),
        ] {
            parse_resolution(value)
                .ok_or_else(|| FaceSwapError::invalid_config(format!("malformed {name}: {value}")))?;
        }

        Ok(SwapConfig {
            source_path,
            target_path,
            output_path,
            face_detector_model: self.face_detector_model,
            face_detector_size: self.face_detector_size,
            face_detector_score: self.face_detector_score,
            face_detector_angles: self.face_detector_angles,
            face_selector_mode: self.face_selector_mode,
            face_selector_order: self.face_selector_order,
            reference_face_position: self.reference_face_position,
            reference_face_distance: self.reference_face_distance,
            reference_frame_number: self.reference_frame_number,
            face_landmarker_model: self.face_landmarker_model,
            face_landmarker_score: self.face_landmarker_score,
            face_mask_types: self.face_mask_types,
            face_mask_blur: self.face_mask_blur,
            face_mask_padding: self.face_mask_padding,
            processors: self.processors,
            face_swapper_model: self.face_swapper_model,
            face_swapper_pixel_boost: self.face_swapper_pixel_boost,
            output_video_encoder: self.output_video_encoder,
            output_video_quality: self.output_video_quality,
            output_video_preset: self.output_video_preset,
            output_video_fps: self.output_video_fps,
            output_video_resolution: self.output_video_resolution,
            output_image_resolution: self.output_image_resolution,
            output_audio_encoder: self.output_audio_encoder,
            trim_frame_start: self.trim_frame_start,
            trim_frame_end: self.trim_frame_end,
            execution_providers: self.execution_providers,
            execution_device_id: self.execution_device_id,
            execution_thread_count: self.execution_thread_count,
            execution_queue_count: self.execution_queue_count,
            video_memory_strategy: self.video_memory_strategy,
            temp_path: self.temp_path,
            temp_frame_format: self.temp_frame_format,
            keep_temp: self.keep_temp,
            skip_audio: self.skip_audio,
            download_providers: self.download_providers,
            download_scope: self.download_scope,
        })
    }
}

/// Parse a `WIDTHxHEIGHT` string such as "1920x1080"
fn parse_resolution(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.split_once('x')?;
    Some((w.parse().ok()?, h.parse().ok()?))
}
