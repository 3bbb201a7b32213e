//! Email address normalization.
//!
//! Emails are compared and stored lower-cased with surrounding whitespace
//! removed, so `" Alice@Example.COM "` and `"alice@example.com"` are the same
//! account.

/// Trim and lower-case an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn already_normal_is_unchanged() {
        assert_eq!(normalize_email("bob@shop.io"), "bob@shop.io");
    }
}
