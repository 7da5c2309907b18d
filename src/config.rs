use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
    name = "batch-annotation-viewer",
    about = "Send a batch of images to an object detection service and view the boxes"
)]
pub struct Args {
    /// Images to load as the initial selection.
    pub images: Vec<PathBuf>,

    /// Base URL of the inference service. Requests go to `<endpoint>/infer`.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Use a built-in fake that returns random boxes instead of calling a service.
    #[arg(long)]
    pub offline: bool,

    /// Where to write the rotated log file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// TrueType or OpenType font for detection labels.
    #[arg(long)]
    pub font: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct OverlayConfig {
    pub line_width: u32,
    pub font_size: f32,
    /// Horizontal space added to the measured label width.
    pub label_padding: u32,
    /// Label background extends this far above the label text height.
    pub label_margin: u32,
    /// TrueType font for labels. The GUI's built-in font is used when unset.
    pub font_path: Option<PathBuf>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            line_width: 2,
            font_size: 16.0,
            label_padding: 6,
            label_margin: 4,
            font_path: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub request_timeout: Option<Duration>,
    pub offline: bool,
    pub initial_images: Vec<PathBuf>,
    pub logger_timezone: chrono::FixedOffset,
    pub log_file: PathBuf,
    pub log_max_bytes: u64,
    pub log_backups: usize,
    pub overlay: OverlayConfig,
    pub window_size: [f32; 2],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000".to_string(),
            request_timeout: None,
            offline: false,
            initial_images: vec![],
            logger_timezone: local_offset(),
            log_file: PathBuf::from("batch-annotation-viewer.log"),
            log_max_bytes: 5 * 1024 * 1024,
            log_backups: 3,
            overlay: OverlayConfig::default(),
            window_size: [1024.0, 768.0],
        }
    }
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        let default = Config::default();
        Self {
            endpoint: args.endpoint.unwrap_or(default.endpoint),
            offline: args.offline,
            initial_images: args.images,
            log_file: args.log_file.unwrap_or(default.log_file),
            overlay: OverlayConfig {
                font_path: args.font,
                ..default.overlay.clone()
            },
            ..default
        }
    }
}

fn local_offset() -> chrono::FixedOffset {
    *chrono::Local::now().offset()
}
