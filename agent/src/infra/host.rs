//! Host facts reported alongside API responses.

/// The machine's hostname, or `"unknown"` if it cannot be read.
#[must_use]
pub fn hostname() -> String {
    match nix::unistd::gethostname() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read hostname");
            "unknown".to_string()
        }
    }
}
