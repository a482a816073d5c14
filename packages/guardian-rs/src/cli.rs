//! Command line arguments backing the `guardian` binary.
use clap::{Args as ClapArgs, Parser, Subcommand};
use guardian_rs::{EngineOptions, RedactionConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
  name = "guardian",
  about = "Blur text found by OCR in images before sharing them",
  version
)]
pub struct Args {
  /// Log debug details (overridden by RUST_LOG)
  #[arg(long, short = 'v', global = true)]
  pub verbose: bool,

  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Print version information
  Version,
  /// Redact a single image and print the output path
  Image {
    /// Image to redact
    path: PathBuf,

    #[command(flatten)]
    tuning: Tuning,
  },
  /// Redact every image below a directory
  Batch {
    /// Directory to scan recursively
    #[arg(long, short = 'd')]
    dir: PathBuf,

    /// Write outputs under this directory instead of next to the inputs
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// Number of images redacted at once
    #[arg(long, short = 'j', default_value = "4")]
    max_concurrent: usize,

    /// Glob (relative to --dir) of files to leave alone; repeatable
    #[arg(long, short = 'x')]
    exclude: Vec<String>,

    /// Write a JSON report of the run to this file
    #[arg(long)]
    report: Option<PathBuf>,

    #[command(flatten)]
    tuning: Tuning,
  },
  /// Audio redaction placeholder; echoes the path
  Audio {
    /// Audio file
    path: String,
  },
}

/// Detection and blur settings shared by the image and batch commands
#[derive(ClapArgs, Debug, Clone)]
pub struct Tuning {
  /// Blur regions whose OCR confidence is strictly above this
  #[arg(long, short = 't', default_value = "30", allow_negative_numbers = true)]
  pub threshold: i32,

  /// Gaussian kernel size in pixels (odd)
  #[arg(long, short = 'k', default_value = "31")]
  pub kernel_size: u32,

  /// Gaussian standard deviation
  #[arg(long, short = 's', default_value = "30")]
  pub sigma: f32,

  /// Text inserted before the output file extension
  #[arg(long, default_value = "_blurred")]
  pub suffix: String,

  /// Tesseract language code(s), e.g. eng or eng+deu
  #[arg(long, short = 'l', default_value = "eng")]
  pub lang: String,

  /// Directory containing Tesseract traineddata files
  #[arg(long)]
  pub tessdata: Option<PathBuf>,
}

impl Tuning {
  pub fn redaction_config(&self) -> RedactionConfig {
    RedactionConfig {
      confidence_threshold: self.threshold,
      kernel_size: self.kernel_size,
      sigma: self.sigma,
      suffix: self.suffix.clone(),
    }
  }

  pub fn engine_options(&self) -> EngineOptions {
    EngineOptions {
      language: self.lang.clone(),
      tessdata_dir: self.tessdata.clone(),
    }
  }
}
