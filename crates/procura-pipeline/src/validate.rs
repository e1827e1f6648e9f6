//! Supplier search, deduplication, and WHOIS validation.
//!
//! The full pass for one article: trigger backend discovery, deduplicate the
//! returned list by website key, purge duplicates server-side, refetch, then
//! WHOIS-check the survivors. Validation runs once per article; the cache's
//! freshness flag suppresses re-checking until explicitly invalidated.

use std::collections::HashSet;

use futures::StreamExt;
use futures::future::join_all;
use futures::stream;
use procura_client::ApiClient;
use procura_core::{Supplier, WhoisStatus, deduplicate, website_key};
use procura_store::{CachePort, WhoisCache};
use tracing::{info, warn};

use crate::PipelineError;

/// Tuning for the WHOIS worker pool.
///
/// The check is rate-limited upstream; the pool keeps at most
/// `whois_concurrency` batch requests in flight, each carrying up to
/// `whois_batch` websites. The terminal state is the same as a sequential
/// pass: deletes are idempotent and status writes are last-write-wins.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub whois_concurrency: usize,
    pub whois_batch: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            whois_concurrency: 4,
            whois_batch: 8,
        }
    }
}

/// Aggregate counts from one validation pass, for the user-facing summary.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Suppliers that had a website key and were submitted for checking.
    pub checked: usize,
    /// Confirmed registrable; recorded `valid` in the status cache.
    pub valid: usize,
    /// Failed the check and were deleted from the backend.
    pub deleted: usize,
    /// Could not be confirmed (check request failed); kept untouched.
    pub unconfirmed: usize,
    /// Failed the check but could not be deleted; kept, still live server-side.
    pub delete_failures: usize,
}

/// Result of a full search pass for one article.
#[derive(Debug)]
pub struct SearchOutcome {
    /// The supplier list after dedup purge and (if it ran) validation.
    pub suppliers: Vec<Supplier>,
    pub duplicates_removed: usize,
    /// `None` when the article was already validated and `force` was not set.
    pub validation: Option<ValidationReport>,
}

/// Run supplier discovery for an article, then dedupe, purge, and validate.
///
/// Duplicate deletions are issued concurrently and are best-effort: an
/// individual failure is logged and never aborts the pass. All deletes are
/// awaited before the list is refetched, so purged duplicates cannot
/// reappear in the refreshed list.
pub async fn search_and_validate<P: CachePort>(
    client: &ApiClient,
    cache: &mut WhoisCache<P>,
    config: &PipelineConfig,
    article_id: u64,
    force: bool,
) -> Result<SearchOutcome, PipelineError> {
    client.search_suppliers(article_id).await?;
    let found = client.list_suppliers(article_id).await?;

    let dedup = deduplicate(found);
    let duplicates_removed = dedup.removed.len();
    if duplicates_removed > 0 {
        info!(article_id, count = duplicates_removed, "purging duplicate suppliers");
        let deletes = dedup
            .removed
            .iter()
            .map(|supplier| async move { (supplier.id, client.delete_supplier(supplier.id).await) });
        for (id, result) in join_all(deletes).await {
            if let Err(err) = result {
                warn!(supplier_id = id, %err, "failed to delete duplicate supplier");
            }
        }
    }

    // Deletes are done; now the refreshed list is authoritative.
    let mut suppliers = client.list_suppliers(article_id).await?;

    if force && let Err(err) = cache.invalidate(article_id) {
        warn!(article_id, %err, "failed to persist cache invalidation");
    }

    let validation = if cache.is_checked(article_id) {
        info!(article_id, "supplier list already validated; skipping whois");
        None
    } else {
        let (kept, report) = validate_suppliers(client, cache, config, suppliers).await?;
        suppliers = kept;
        if let Err(err) = cache.mark_checked(article_id) {
            warn!(article_id, %err, "failed to persist validation freshness flag");
        }
        Some(report)
    };

    Ok(SearchOutcome {
        suppliers,
        duplicates_removed,
        validation,
    })
}

/// WHOIS-validate a supplier list with a bounded worker pool.
///
/// Suppliers without a website key are kept untouched. The rest are checked
/// in batches; a supplier whose website is confirmed is kept and its key is
/// cached `valid`, one whose website fails the check is deleted from the
/// backend and dropped. A failed batch request means "could not confirm":
/// its suppliers are kept with statuses untouched and the pass continues.
pub async fn validate_suppliers<P: CachePort>(
    client: &ApiClient,
    cache: &mut WhoisCache<P>,
    config: &PipelineConfig,
    suppliers: Vec<Supplier>,
) -> Result<(Vec<Supplier>, ValidationReport), PipelineError> {
    let mut report = ValidationReport::default();
    let mut kept = Vec::with_capacity(suppliers.len());
    let mut keyed = Vec::new();

    for supplier in suppliers {
        match supplier.website.as_deref().and_then(website_key) {
            Some(key) => keyed.push((supplier, key)),
            None => kept.push(supplier),
        }
    }
    report.checked = keyed.len();
    if keyed.is_empty() {
        return Ok((kept, report));
    }

    let batch = config.whois_batch.max(1);
    let chunks: Vec<Vec<(Supplier, String)>> = keyed.chunks(batch).map(<[_]>::to_vec).collect();

    let checks: Vec<_> = stream::iter(chunks)
        .map(|chunk| {
            let websites: Vec<String> = chunk.iter().map(|(_, key)| key.clone()).collect();
            async move {
                let result = client.whois_check(&websites).await;
                (chunk, result)
            }
        })
        .buffer_unordered(config.whois_concurrency.max(1))
        .collect()
        .await;

    for (chunk, result) in checks {
        match result {
            Err(err) => {
                warn!(count = chunk.len(), %err, "whois check failed; keeping suppliers unconfirmed");
                report.unconfirmed += chunk.len();
                kept.extend(chunk.into_iter().map(|(supplier, _)| supplier));
            }
            Ok(valid) => {
                let valid: HashSet<String> =
                    valid.iter().filter_map(|w| website_key(w)).collect();
                for (supplier, key) in chunk {
                    if valid.contains(&key) {
                        remember(cache, &key, WhoisStatus::Valid);
                        report.valid += 1;
                        kept.push(supplier);
                    } else {
                        match client.delete_supplier(supplier.id).await {
                            Ok(()) => {
                                info!(supplier_id = supplier.id, website = %key, "deleted supplier with unresolvable website");
                                remember(cache, &key, WhoisStatus::Invalid);
                                report.deleted += 1;
                            }
                            Err(err) => {
                                warn!(supplier_id = supplier.id, %err, "failed to delete invalid supplier");
                                report.delete_failures += 1;
                                kept.push(supplier);
                            }
                        }
                    }
                }
            }
        }
    }

    Ok((kept, report))
}

/// The status cache is advisory; a failed write is logged, never fatal.
fn remember<P: CachePort>(cache: &mut WhoisCache<P>, key: &str, status: WhoisStatus) {
    if let Err(err) = cache.set_status(key, status) {
        warn!(website = key, %err, "failed to persist whois status");
    }
}
