//! Website key normalisation for deduplication and the WHOIS status cache.
//!
//! Supplier websites arrive in whatever spelling the discovery backend
//! scraped: `https://www.acme.com/`, `acme.com`, `HTTP://ACME.COM/contact`.
//! The WHOIS contract exchanges bare domains, so dedup keys and cache keys
//! must collapse all of these onto one canonical form.

/// Normalise a raw website string into a canonical domain key.
///
/// Lowercases, strips an `http://`/`https://` scheme, a leading `www.`,
/// and anything from the first `/` on. Empty or whitespace-only input
/// yields `None`: a supplier without a website has no key and is never
/// deduplicated or WHOIS-checked.
///
/// `website_key("https://www.Acme.com/about")` → `Some("acme.com")`
pub fn website_key(raw: &str) -> Option<String> {
    let mut s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let lower = s.to_ascii_lowercase();
    s = lower.as_str();

    for scheme in ["https://", "http://"] {
        if let Some(rest) = s.strip_prefix(scheme) {
            s = rest;
            break;
        }
    }
    if let Some(rest) = s.strip_prefix("www.") {
        s = rest;
    }
    if let Some(slash) = s.find('/') {
        s = &s[..slash];
    }

    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
