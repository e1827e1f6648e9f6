//! Email discovery and manual override.
//!
//! Discovery is delegated entirely to the backend; the client's job is the
//! state transition around it. The optimistic patch is explicit two-phase:
//! the supplier is updated before the persist call and reverted if the
//! persist fails, so local state never silently diverges from the backend.

use futures::future::join_all;
use procura_client::{ApiClient, ApiError};
use procura_core::{Supplier, is_valid_email};
use tracing::{info, warn};

use crate::PipelineError;

/// Observable outcome of a discovery attempt.
#[derive(Debug)]
pub enum EmailUpdate {
    /// Backend found nothing; the supplier is untouched and nothing was
    /// persisted.
    NotFound,
    /// Optimistic patch confirmed by the backend.
    Confirmed { email: String },
    /// Persist failed after the optimistic patch; the previous value has
    /// been restored.
    Reverted {
        attempted: String,
        previous: Option<String>,
        error: ApiError,
    },
}

/// Aggregate counts from a bulk email syntax pass.
#[derive(Debug, Clone, Default)]
pub struct EmailValidationReport {
    pub valid: usize,
    pub invalid: usize,
    /// Suppliers without an email.
    pub skipped: usize,
    /// Persist calls that failed.
    pub failures: usize,
}

/// Discover a supplier's email via the backend search.
///
/// An empty search result leaves the supplier unchanged and issues no
/// persistence call. A hit is applied optimistically, persisted, and
/// reverted if persistence fails.
pub async fn discover_email(
    client: &ApiClient,
    supplier: &mut Supplier,
) -> Result<EmailUpdate, PipelineError> {
    let website = supplier.website.clone().unwrap_or_default();
    let found = client
        .search_email(&supplier.name, &website, supplier.country.as_deref())
        .await?;

    let Some(email) = found else {
        info!(supplier_id = supplier.id, "email discovery found nothing");
        return Ok(EmailUpdate::NotFound);
    };

    // Pending: apply locally before the backend confirms.
    let previous = supplier.email.replace(email.clone());

    match client.set_supplier_email(supplier.id, &email).await {
        Ok(()) => {
            info!(supplier_id = supplier.id, "email discovered and persisted");
            Ok(EmailUpdate::Confirmed { email })
        }
        Err(error) => {
            warn!(supplier_id = supplier.id, %error, "email persist failed; reverting optimistic update");
            supplier.email = previous.clone();
            Ok(EmailUpdate::Reverted {
                attempted: email,
                previous,
                error,
            })
        }
    }
}

/// Persist a manually entered email.
///
/// Entry-time validation is deliberately absent: any non-empty string is
/// accepted; the syntax check belongs to [`validate_emails`]. An empty
/// string is the precondition failure and sends nothing.
pub async fn save_manual_email(
    client: &ApiClient,
    supplier: &mut Supplier,
    email: &str,
) -> Result<(), PipelineError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(PipelineError::EmptyEmail);
    }
    client.set_supplier_email(supplier.id, email).await?;
    supplier.email = Some(email.to_string());
    Ok(())
}

/// Bulk syntax pass: mark each supplier's stored email valid or invalid.
///
/// Best-effort across the list; individual persist failures are logged and
/// counted.
pub async fn validate_emails(client: &ApiClient, suppliers: &[Supplier]) -> EmailValidationReport {
    let mut report = EmailValidationReport::default();

    let patches = suppliers.iter().filter_map(|supplier| {
        let email = supplier.email.as_deref()?;
        let valid = is_valid_email(email);
        Some(async move { (supplier.id, valid, client.set_email_validated(supplier.id, valid).await) })
    });
    report.skipped = suppliers.iter().filter(|s| s.email.is_none()).count();

    for (id, valid, result) in join_all(patches).await {
        match result {
            Ok(()) if valid => report.valid += 1,
            Ok(()) => report.invalid += 1,
            Err(err) => {
                warn!(supplier_id = id, %err, "failed to persist email validity");
                report.failures += 1;
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(server.uri(), Some("test-token".into()))
    }

    fn supplier(email: Option<&str>) -> Supplier {
        Supplier {
            id: 5,
            article_id: 1,
            name: "Acme".into(),
            website: Some("acme.com".into()),
            email: email.map(str::to_string),
            country: Some("DE".into()),
        }
    }

    #[tokio::test]
    async fn not_found_changes_nothing_and_persists_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search_email_perplexity"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": ""})))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut s = supplier(Some("old@acme.com"));
        let update = discover_email(&client, &mut s).await.unwrap();

        assert!(matches!(update, EmailUpdate::NotFound));
        assert_eq!(s.email.as_deref(), Some("old@acme.com"));
    }

    #[tokio::test]
    async fn discovery_confirmed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search_email_perplexity"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"email": "sales@acme.com"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/suppliers/5/email"))
            .and(body_json(json!({"email": "sales@acme.com"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut s = supplier(None);
        let update = discover_email(&client, &mut s).await.unwrap();

        assert!(matches!(update, EmailUpdate::Confirmed { .. }));
        assert_eq!(s.email.as_deref(), Some("sales@acme.com"));
    }

    #[tokio::test]
    async fn discovery_reverts_on_persist_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search_email_perplexity"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"email": "new@acme.com"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/suppliers/5/email"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut s = supplier(Some("old@acme.com"));
        let update = discover_email(&client, &mut s).await.unwrap();

        match update {
            EmailUpdate::Reverted {
                attempted,
                previous,
                ..
            } => {
                assert_eq!(attempted, "new@acme.com");
                assert_eq!(previous.as_deref(), Some("old@acme.com"));
            }
            other => panic!("expected Reverted, got {other:?}"),
        }
        // Local state restored.
        assert_eq!(s.email.as_deref(), Some("old@acme.com"));
    }

    #[tokio::test]
    async fn manual_email_rejects_empty_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut s = supplier(None);
        let err = save_manual_email(&client, &mut s, "   ").await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyEmail));
    }

    #[tokio::test]
    async fn manual_email_accepts_any_non_empty_string() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/suppliers/5/email"))
            .and(body_json(json!({"email": "not-an-address"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut s = supplier(None);
        save_manual_email(&client, &mut s, "not-an-address")
            .await
            .unwrap();
        assert_eq!(s.email.as_deref(), Some("not-an-address"));
    }

    #[tokio::test]
    async fn bulk_pass_marks_valid_and_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/suppliers/5/email_validated"))
            .and(body_json(json!({"valid": true})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/suppliers/6/email_validated"))
            .and(body_json(json!({"valid": false})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut junk = supplier(Some("junk"));
        junk.id = 6;
        let suppliers = vec![
            supplier(Some("sales@acme.com")),
            junk,
            supplier(None), // skipped, no email
        ];

        let client = client_for(&server);
        let report = validate_emails(&client, &suppliers).await;
        assert_eq!(report.valid, 1);
        assert_eq!(report.invalid, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failures, 0);
    }
}
