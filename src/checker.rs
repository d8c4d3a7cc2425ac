//! Fail-fast validation for constructor arguments.

use crate::VaultError;

/// Require a non-blank string argument, returning it owned.
pub(crate) fn not_blank(name: &str, value: impl Into<String>) -> Result<String, VaultError> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(VaultError::invalid_argument(name, "must not be blank"));
    }
    Ok(value)
}

/// Normalize a mount point: strip surrounding whitespace and slashes.
/// A mount point that normalizes to nothing is a construction error.
pub(crate) fn mount_point(value: impl Into<String>) -> Result<String, VaultError> {
    let value = value.into();
    let trimmed = value.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(VaultError::invalid_argument(
            "mount_point",
            "must not be blank",
        ));
    }
    Ok(trimmed.to_string())
}
