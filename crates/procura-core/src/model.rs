//! Wire types shared between the sourcing backend and the client workflows.

use serde::{Deserialize, Serialize};

/// An article (sourcing code / SKU) tracked by the backend.
///
/// Created by user input or CSV import; optionally attached to a [`Request`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    pub code: String,
    #[serde(default)]
    pub request_id: Option<u64>,
}

/// A candidate vendor discovered for an article by the backend search.
///
/// Belongs to exactly one article. `website`, `email`, and `country` are
/// filled in progressively by discovery and validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: u64,
    pub article_id: u64,
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// A procurement request (invoice) grouping articles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    pub number: String,
    /// ISO 8601 timestamp string.
    pub created_at: String,
}

/// Client-observable WHOIS state of a supplier website.
///
/// Transitions: unchecked → `Checking` → `Valid` | `Invalid`. `Invalid` is
/// terminal and implies the supplier has been deleted from the backend;
/// `Valid` entries survive restarts via the persistent status cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhoisStatus {
    Checking,
    Valid,
    Invalid,
}

impl WhoisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}
