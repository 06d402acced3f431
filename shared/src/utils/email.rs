//! Email address validation and masking utilities.

use once_cell::sync::Lazy;
use regex::Regex;

/// Basic shape check: non-empty local part, non-empty domain containing a dot,
/// no whitespace. Deliverability is not our problem; the mailbox proves itself
/// by receiving the secret.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Check whether an email address is syntactically well-formed
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Mask an email address for logging
///
/// Keeps the first character of the local part and the full domain, e.g.
/// `alice@example.com` becomes `a***@example.com`. Anything without a
/// recognizable shape collapses to `***`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            let first = local.chars().next().unwrap_or('*');
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}
