//! Audio redaction placeholder. Nothing is processed yet.

/// Returns a fixed description of the call, echoing `path` verbatim.
pub fn redact_audio_stub(path: &str) -> String {
  format!("[guardian] Redaction stub called on: {}", path)
}
