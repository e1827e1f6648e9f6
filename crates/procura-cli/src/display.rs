//! Human-readable table and summary output.

use chrono::DateTime;
use procura_core::{Article, Request, Supplier, website_key};
use procura_pipeline::{EmailValidationReport, ImportReport, SearchOutcome};
use procura_store::{CachePort, WhoisCache};

pub fn print_articles(articles: &[Article]) {
    if articles.is_empty() {
        println!("No articles.");
        return;
    }
    println!("{:<8} {:<20} {}", "id", "code", "request");
    for article in articles {
        let request = article
            .request_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<8} {:<20} {}", article.id, article.code, request);
    }
}

pub fn print_suppliers<P: CachePort>(suppliers: &[Supplier], cache: &WhoisCache<P>) {
    if suppliers.is_empty() {
        println!("No suppliers.");
        return;
    }
    println!(
        "{:<8} {:<28} {:<26} {:<26} {:<8} {}",
        "id", "name", "website", "email", "country", "whois"
    );
    for supplier in suppliers {
        let status = supplier
            .website
            .as_deref()
            .and_then(website_key)
            .and_then(|key| cache.status(&key))
            .map(|s| s.as_str())
            .unwrap_or("-");
        println!(
            "{:<8} {:<28} {:<26} {:<26} {:<8} {}",
            supplier.id,
            supplier.name,
            supplier.website.as_deref().unwrap_or("-"),
            supplier.email.as_deref().unwrap_or("-"),
            supplier.country.as_deref().unwrap_or("-"),
            status,
        );
    }
}

pub fn print_search_outcome<P: CachePort>(outcome: &SearchOutcome, cache: &WhoisCache<P>) {
    match &outcome.validation {
        Some(report) => {
            println!(
                "Search done: {} duplicates purged, {} checked, {} valid, {} deleted, {} unconfirmed",
                outcome.duplicates_removed,
                report.checked,
                report.valid,
                report.deleted,
                report.unconfirmed,
            );
            if report.delete_failures > 0 {
                println!(
                    "Warning: {} invalid suppliers could not be deleted",
                    report.delete_failures
                );
            }
        }
        None => println!(
            "Search done: {} duplicates purged, validation skipped (already checked; use --force to re-check)",
            outcome.duplicates_removed,
        ),
    }
    println!();
    print_suppliers(&outcome.suppliers, cache);
}

pub fn print_requests(requests: &[Request]) {
    if requests.is_empty() {
        println!("No requests.");
        return;
    }
    println!("{:<8} {:<20} {}", "id", "number", "created");
    for request in requests {
        let created = DateTime::parse_from_rfc3339(&request.created_at)
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| request.created_at.clone());
        println!("{:<8} {:<20} {}", request.id, request.number, created);
    }
}

pub fn print_import_report(report: &ImportReport) {
    println!(
        "Import done: {} created, {} blank rows skipped, {} failed",
        report.created, report.skipped, report.failed
    );
}

pub fn print_email_validation_report(report: &EmailValidationReport) {
    println!(
        "Email check done: {} valid, {} invalid, {} without email, {} failed to save",
        report.valid, report.invalid, report.skipped, report.failures
    );
}
