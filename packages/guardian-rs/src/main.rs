mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Args, Commands};
use guardian_rs::{
  default_engine, derive_output_path, load_image, redact_audio_stub, BatchOptions, BatchRedactor, ImageRedactor,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
  let args = Args::parse();

  let default_level = if args.verbose {
    "guardian=debug,guardian_rs=debug,guardian_ocr=debug"
  } else {
    "guardian=info,guardian_rs=info,guardian_ocr=warn"
  };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .init();

  match run(args).await {
    Ok(success) => {
      if !success {
        std::process::exit(1);
      }
    }
    Err(e) => {
      eprintln!("Error: {:#}", e);
      std::process::exit(1);
    }
  }
}

async fn run(args: Args) -> Result<bool> {
  match args.command {
    Commands::Version => {
      println!("guardian {}", env!("CARGO_PKG_VERSION"));
      Ok(true)
    }
    Commands::Image { path, tuning } => {
      // Bad settings and unreadable inputs are reported before the engine starts
      let config = tuning.redaction_config();
      config.validate()?;
      let output = derive_output_path(&path, &config.suffix);
      let decoded = {
        let path = path.clone();
        tokio::task::spawn_blocking(move || load_image(&path))
          .await
          .context("load task panicked")??
      };

      let engine = default_engine(&tuning.engine_options()).context("failed to start OCR engine")?;
      let redactor = ImageRedactor::new(engine, config)?;

      let outcome = tokio::task::spawn_blocking(move || redactor.redact_decoded(&path, decoded, &output))
        .await
        .context("redaction task panicked")??;

      println!("{}", outcome.output_path.display());
      Ok(true)
    }
    Commands::Batch {
      dir,
      output_dir,
      max_concurrent,
      exclude,
      report,
      tuning,
    } => {
      let config = tuning.redaction_config();
      config.validate()?;

      let engine = default_engine(&tuning.engine_options()).context("failed to start OCR engine")?;
      let batch = BatchRedactor::new(ImageRedactor::new(engine, config)?);

      let options = BatchOptions {
        dir,
        output_dir,
        file_exclusions: exclude,
        max_concurrent_files: max_concurrent,
        report_path: report,
      };
      let report = batch.run(&options).await?;

      for entry in &report.entries {
        match (&entry.output, &entry.error) {
          (Some(output), _) => println!("{} -> {}", entry.input.display(), output.display()),
          (None, Some(error)) => println!("{} FAILED: {}", entry.input.display(), error),
          (None, None) => {}
        }
      }
      println!(
        "Redacted {}/{} images ({} failed)",
        report.redacted, report.total_files, report.failed
      );
      Ok(report.failed == 0)
    }
    Commands::Audio { path } => {
      println!("{}", redact_audio_stub(&path));
      Ok(true)
    }
  }
}
