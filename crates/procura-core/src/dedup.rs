//! Supplier deduplication by website key.

use std::collections::HashSet;

use crate::model::Supplier;
use crate::website::website_key;

/// Outcome of a deduplication pass.
///
/// `unique` preserves input order; `removed` holds the later duplicates,
/// which the caller is expected to delete from the backend (duplicates are
/// purged, never just hidden).
#[derive(Debug, Clone)]
pub struct DedupResult {
    pub unique: Vec<Supplier>,
    pub removed: Vec<Supplier>,
}

/// Partition a supplier list into first-occurrence-per-website and duplicates.
///
/// Two suppliers are duplicates when their websites normalise to the same
/// [`website_key`]. Suppliers without a website key cannot be deduplicated
/// and are always kept, unchanged in count and order.
///
/// Idempotent: running the pass over its own `unique` output removes nothing.
pub fn deduplicate(suppliers: Vec<Supplier>) -> DedupResult {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(suppliers.len());
    let mut removed = Vec::new();

    for supplier in suppliers {
        match supplier.website.as_deref().and_then(website_key) {
            Some(key) => {
                if seen.insert(key) {
                    unique.push(supplier);
                } else {
                    removed.push(supplier);
                }
            }
            None => unique.push(supplier),
        }
    }

    DedupResult { unique, removed }
}
