//! CSV article import.
//!
//! Header-less files, first column is the article code. Blank rows are
//! skipped, malformed rows are dropped with a warning, and creation is
//! best-effort per row: a failing create never aborts the batch.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use futures::future::join_all;
use procura_client::ApiClient;
use tracing::warn;

use crate::PipelineError;

/// Aggregate counts from one import, for the user-facing summary.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub created: usize,
    /// Rows whose first column was empty or whitespace.
    pub skipped: usize,
    /// Rows whose create call failed.
    pub failed: usize,
}

/// Import article codes from a CSV file.
pub async fn import_articles(
    client: &ApiClient,
    path: &Path,
) -> Result<ImportReport, PipelineError> {
    let file = File::open(path)?;
    import_articles_from_reader(client, file).await
}

/// Import article codes from any CSV byte stream.
pub async fn import_articles_from_reader<R: Read>(
    client: &ApiClient,
    reader: R,
) -> Result<ImportReport, PipelineError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut report = ImportReport::default();
    let mut codes = Vec::new();

    for record in csv_reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!(%err, "dropping malformed CSV row");
                report.failed += 1;
                continue;
            }
        };
        let code = record.get(0).map(str::trim).unwrap_or_default();
        if code.is_empty() {
            report.skipped += 1;
            continue;
        }
        codes.push(code.to_string());
    }

    let creates = codes
        .iter()
        .map(|code| async move { (code.as_str(), client.add_article(code).await) });
    for (code, result) in join_all(creates).await {
        match result {
            Ok(_) => report.created += 1,
            Err(err) => {
                warn!(code, %err, "failed to create article from CSV row");
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
