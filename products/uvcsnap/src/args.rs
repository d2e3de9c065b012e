use {
    crate::FileNamer,
    anyhow::{Context, bail},
    clap::Parser,
    image::{DEFAULT_QUALITY, StorageMode},
    log::LevelFilter,
    std::{path::PathBuf, time::Duration},
    video::{CaptureConfig, Resolution},
};

/// Capture JPEG snapshots from a UVC camera.
#[derive(Debug, Clone, Parser)]
#[command(name = "uvcsnap", version)]
pub struct Args {
    /// Output file name template: printf-style with %d (frames taken so far),
    /// or date/time with --strftime
    #[arg(long, value_name = "TEMPLATE")]
    pub result: Option<String>,

    /// Capture device
    #[arg(long, value_name = "PATH", default_value = "/dev/video0")]
    pub device: PathBuf,

    /// Requested resolution
    #[arg(long, value_name = "WxH", default_value = "640x480")]
    pub resolution: Resolution,

    /// JPEG quality when recompressing
    #[arg(long, default_value_t = DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub quality: u8,

    /// Number of frames to skip before the first capture
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub skip: u64,

    /// Number of images to capture
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub count: u64,

    /// Pause between captures
    #[arg(long, value_name = "SECONDS", default_value = "0", value_parser = parse_pause)]
    pub pause: Duration,

    /// Run in a loop, overrides --count
    #[arg(long = "loop")]
    pub loop_mode: bool,

    /// Expand the template with the current date and time
    #[arg(long)]
    pub strftime: bool,

    /// Store frames exactly as the camera sent them
    #[arg(long)]
    pub save_jpeg_asis: bool,

    /// Keep going when a frame can't be stored
    #[arg(long)]
    pub ignore_jpeg_errors: bool,

    /// Suppress JPEG decoder warnings
    #[arg(long)]
    pub quiet: bool,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_pause(text: &str) -> Result<Duration, String> {
    let seconds: f64 = text
        .parse()
        .map_err(|_| format!("'{text}' is not a number of seconds"))?;
    Duration::try_from_secs_f64(seconds).map_err(|_| format!("'{text}' is not a valid pause"))
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// The file naming scheme. Fails when `--result` is missing or invalid.
    pub fn file_namer(&self) -> anyhow::Result<FileNamer> {
        let Some(template) = self.result.as_deref() else {
            bail!("--result is mandatory");
        };
        let namer = if self.strftime {
            FileNamer::strftime(template)
        } else {
            FileNamer::index(template)
        };
        namer.with_context(|| format!("invalid --result '{template}'"))
    }

    pub fn storage_mode(&self) -> StorageMode {
        if self.save_jpeg_asis {
            StorageMode::Verbatim
        } else {
            StorageMode::Recompress {
                quality: self.quality,
            }
        }
    }

    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig::default()
            .with_device(self.device.clone())
            .with_resolution(self.resolution)
            .with_count(self.count)
            .with_skip(self.skip)
            .with_pause(self.pause)
            .with_loop_mode(self.loop_mode)
            .with_ignore_errors(self.ignore_jpeg_errors)
    }
}
