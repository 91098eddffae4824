//! Parameter validation helpers.
//!
//! The public API accepts names and numbers from beginner code, so instead of
//! coercing values at runtime these helpers parse and check once, up front,
//! and return a typed result or a descriptive error.

use crate::error::MicroError;

/// Check that `name` is a valid resource/animation identifier and return it
/// lowercased and trimmed.
///
/// An identifier is an ASCII letter followed by any number of ASCII letters
/// or digits. Resource lookups are case-insensitive, so the canonical form
/// is lowercase.
pub fn identifier(name: &str) -> Result<String, MicroError> {
    let name = name.trim().to_ascii_lowercase();
    if is_identifier(&name) {
        Ok(name)
    } else {
        Err(MicroError::InvalidName(name))
    }
}

/// True if `s` matches the identifier pattern: ASCII letter, then letters or
/// digits. Assumes `s` is already lowercased.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// Check that `value` is strictly positive.
pub fn positive(name: &str, value: i32) -> Result<i32, MicroError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(MicroError::Validation(format!(
            "`{name}` must be greater than zero (got {value})"
        )))
    }
}

/// Check that `value` falls within `min..=max`.
pub fn in_range(name: &str, value: u32, min: u32, max: u32) -> Result<u32, MicroError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(MicroError::Validation(format!(
            "`{name}` must be between {min} and {max} (got {value})"
        )))
    }
}

/// Clamp a volume to the `0.0..=1.0` range.
pub fn volume(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_accepts_letters_and_digits() {
        assert_eq!(identifier("Player1").unwrap(), "player1");
        assert_eq!(identifier("  walk  ").unwrap(), "walk");
        assert_eq!(identifier("a").unwrap(), "a");
    }

    #[test]
    fn identifier_rejects_bad_names() {
        assert!(matches!(identifier("1player"), Err(MicroError::InvalidName(_))));
        assert!(matches!(identifier("has space"), Err(MicroError::InvalidName(_))));
        assert!(matches!(identifier("under_score"), Err(MicroError::InvalidName(_))));
        assert!(matches!(identifier(""), Err(MicroError::InvalidName(_))));
        assert!(matches!(identifier(".white"), Err(MicroError::InvalidName(_))));
    }

    #[test]
    fn positive_rejects_zero_and_negative() {
        assert_eq!(positive("width", 5).unwrap(), 5);
        assert!(positive("width", 0).is_err());
        assert!(positive("width", -3).is_err());
    }

    #[test]
    fn in_range_bounds_are_inclusive() {
        assert!(in_range("width", 1, 1, 2048).is_ok());
        assert!(in_range("width", 2048, 1, 2048).is_ok());
        assert!(in_range("width", 0, 1, 2048).is_err());
        assert!(in_range("width", 2049, 1, 2048).is_err());
    }

    #[test]
    fn volume_is_clamped() {
        assert_eq!(volume(-0.5), 0.0);
        assert_eq!(volume(0.25), 0.25);
        assert_eq!(volume(3.0), 1.0);
    }
}
