//! Tuning knobs for a redaction run.
use crate::error::RedactError;

/// Configuration for image redaction
#[derive(Debug, Clone, PartialEq)]
pub struct RedactionConfig {
  /// Regions must score strictly above this to be blurred
  pub confidence_threshold: i32,
  /// Side length of the square Gaussian kernel; odd and non-zero
  pub kernel_size: u32,
  /// Standard deviation of the Gaussian kernel
  pub sigma: f32,
  /// Inserted between the file stem and its extension
  pub suffix: String,
}

impl Default for RedactionConfig {
  fn default() -> Self {
    Self {
      confidence_threshold: 30,
      kernel_size: 31,
      sigma: 30.0,
      suffix: "_blurred".to_string(),
    }
  }
}

impl RedactionConfig {
  pub fn validate(&self) -> Result<(), RedactError> {
    if self.kernel_size == 0 || self.kernel_size % 2 == 0 {
      return Err(RedactError::InvalidConfig(format!(
        "kernel size must be odd and positive, got {}",
        self.kernel_size
      )));
    }
    if !(self.sigma.is_finite() && self.sigma > 0.0) {
      return Err(RedactError::InvalidConfig(format!(
        "sigma must be a positive number, got {}",
        self.sigma
      )));
    }
    if self.suffix.is_empty() {
      return Err(RedactError::InvalidConfig(
        "suffix must not be empty, the output would overwrite the input".to_string(),
      ));
    }
    if self.suffix.contains(std::path::is_separator) {
      return Err(RedactError::InvalidConfig(format!(
        "suffix must not contain a path separator, got {:?}",
        self.suffix
      )));
    }
    Ok(())
  }
}
