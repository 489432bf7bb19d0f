//! Input validation for job tables and configuration
//!
//! Group names, job identifiers and artifact extensions end up as file system
//! path components, so each one must be a single, non-traversing segment.

/// Maximum length of a single path segment
const MAX_SEGMENT_LENGTH: usize = 200;

/// Validates that `value` can be used verbatim as one path component.
///
/// Rejects empty values, separators, `.`/`..`, leading dots, control
/// characters and overlong values. Returns a human-readable reason on failure.
pub fn validate_path_segment(value: &str) -> std::result::Result<(), String> {
    if value.is_empty() {
        return Err("must not be empty".to_string());
    }

    if value.len() > MAX_SEGMENT_LENGTH {
        return Err(format!(
            "too long: {} bytes (max: {MAX_SEGMENT_LENGTH})",
            value.len()
        ));
    }

    if value.starts_with('.') {
        return Err(format!("'{value}' must not start with '.'"));
    }

    if let Some(c) = value
        .chars()
        .find(|c| matches!(c, '/' | '\\' | ':') || c.is_control())
    {
        return Err(format!("'{value}' contains forbidden character {c:?}"));
    }

    Ok(())
}

/// Validates an artifact file extension (given without the leading dot)
pub fn validate_extension(value: &str) -> std::result::Result<(), String> {
    validate_path_segment(value)?;
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("'{value}' must be ASCII alphanumeric"));
    }
    Ok(())
}
