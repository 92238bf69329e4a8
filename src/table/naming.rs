//! Unique names for generated and temporary server-side tables.

use uuid::Uuid;

/// Prefix of generated output tables.
const GENERATED_PREFIX: &str = "_biomed_";

/// A fresh table name, e.g. `_biomed_3f2a...`.
pub fn generate_name() -> String {
    scoped_name(GENERATED_PREFIX)
}

/// `prefix` followed by a call-scoped identifier.
///
/// Table names are case-insensitive on the server and must start with a
/// letter or underscore, so the identifier is the hyphen-free lowercase form.
pub fn scoped_name(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let a = scoped_name("quantify_");
        let b = scoped_name("quantify_");
        assert_ne!(a, b);
        assert!(a.starts_with("quantify_"));
        assert_eq!(a.len(), "quantify_".len() + 32);
    }

    #[test]
    fn test_generated_names_are_identifiers() {
        let name = generate_name();
        assert!(name.starts_with(GENERATED_PREFIX));
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }
}
