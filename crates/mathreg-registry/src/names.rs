//! Binding name validation.
//!
//! Valid names:
//! - Must be non-empty
//! - Must not contain a NUL character
//!
//! Anything else is accepted verbatim and compared by exact byte equality.

use crate::error::{RegistryError, RegistryResult};

/// Validate a binding name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use mathreg_registry::names::validate_name;
///
/// assert!(validate_name("pi").is_ok());
/// assert!(validate_name("a b/c").is_ok());
/// assert!(validate_name("").is_err());
/// ```
pub fn validate_name(name: &str) -> RegistryResult<()> {
    if name.is_empty() {
        return Err(RegistryError::invalid("binding name must not be empty"));
    }
    if name.contains('\0') {
        return Err(RegistryError::invalid(format!(
            "binding name {name:?} contains a NUL character"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_names() {
        assert!(validate_name("x").is_ok());
        assert!(validate_name("matrix_1").is_ok());
        assert!(validate_name("with space").is_ok());
        assert!(validate_name("ünïcødé").is_ok());
    }

    #[test]
    fn empty_rejected() {
        assert!(matches!(
            validate_name(""),
            Err(RegistryError::InvalidInput { .. })
        ));
    }

    #[test]
    fn nul_rejected() {
        assert!(validate_name("a\0b").is_err());
    }
}
