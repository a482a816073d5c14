//! Naming of redacted outputs.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Inserts `suffix` between the file stem and its extension.
///
/// `/a/b/photo.jpg` becomes `/a/b/photo_blurred.jpg`. Only the last extension
/// counts (`x.tar.gz` -> `x.tar_blurred.gz`) and dotfiles have none.
pub fn derive_output_path(input: &Path, suffix: &str) -> PathBuf {
  let stem = input.file_stem().unwrap_or_default();

  let mut name = OsString::from(stem);
  name.push(suffix);
  if let Some(ext) = input.extension() {
    name.push(".");
    name.push(ext);
  }

  input.with_file_name(name)
}

/// True when the stem already carries `suffix`, i.e. the file is a previous output.
pub fn is_derived_output(path: &Path, suffix: &str) -> bool {
  path
    .file_stem()
    .and_then(|s| s.to_str())
    .map(|s| s.ends_with(suffix))
    .unwrap_or(false)
}
