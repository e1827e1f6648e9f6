//! Syntactic email validation.
//!
//! The check is spelling-only (one `@`, no whitespace, a dot in the domain);
//! deliverability is never verified. Manual email entry is deliberately
//! unvalidated; this check belongs to the bulk validate pass.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

/// Whether `email` looks like an address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
