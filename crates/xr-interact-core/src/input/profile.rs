//! Input profile resolution
//!
//! Tracked devices advertise a list of profile ids, most specific first. The
//! first one we support wins; otherwise we fall back to a configured default.

use crate::error::{InteractionError, Result};

/// Pick the profile to use for a device.
///
/// Returns the first entry of `candidates` found in `supported`, else
/// `default` when it is itself supported. Anything else is a configuration
/// error the caller must surface.
pub fn resolve_profile(candidates: &[String], supported: &[String], default: &str) -> Result<String> {
    if let Some(found) = candidates.iter().find(|c| supported.contains(*c)) {
        return Ok(found.clone());
    }

    if supported.iter().any(|s| s == default) {
        tracing::debug!(
            candidates = ?candidates,
            default,
            "No advertised input profile supported, using default"
        );
        return Ok(default.to_string());
    }

    Err(InteractionError::ProfileNotFound {
        candidates: candidates.to_vec(),
        default: default.to_string(),
    })
}
