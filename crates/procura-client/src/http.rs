//! REST client for the sourcing backend.
//!
//! Every call carries a bearer token; a missing token is a precondition
//! failure caught before any request leaves the client.

use procura_core::{Article, Request, Supplier};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("no session token; log in before issuing requests")]
    MissingToken,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("a request numbered {0:?} already exists")]
    DuplicateRequestNumber(String),
}

/// Typed client for the sourcing backend's article / supplier / request
/// endpoints.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct NewArticle<'a> {
    code: &'a str,
}

#[derive(Serialize)]
struct EmailPatch<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct EmailValidatedPatch {
    valid: bool,
}

#[derive(Serialize)]
struct WhoisRequest<'a> {
    websites: &'a [String],
}

#[derive(Deserialize)]
struct WhoisResponse {
    valid: Vec<String>,
}

#[derive(Serialize)]
struct EmailSearchRequest<'a> {
    name: &'a str,
    website: &'a str,
    country: &'a str,
}

#[derive(Deserialize)]
struct EmailSearchResponse {
    email: String,
}

#[derive(Serialize)]
struct NewRequest<'a> {
    number: &'a str,
}

impl ApiClient {
    /// Create a client for the given backend base URL.
    ///
    /// `base_url` should be like `http://localhost:8000` (no trailing slash).
    /// `token` is the session bearer token; calls fail with
    /// [`ApiError::MissingToken`] until one is present.
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::MissingToken)?;
        let url = format!("{}{}", self.base_url, path);
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    async fn expect_success(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    // ── Articles ──

    /// List articles, optionally only those attached to one request.
    pub async fn list_articles(&self, request_id: Option<u64>) -> Result<Vec<Article>, ApiError> {
        let mut req = self.request(Method::GET, "/articles")?;
        if let Some(id) = request_id {
            req = req.query(&[("request_id", id)]);
        }
        let resp = Self::expect_success(req.send().await?).await?;
        Ok(resp.json().await?)
    }

    /// Create an article by code (idempotent-by-code on the backend).
    pub async fn add_article(&self, code: &str) -> Result<Article, ApiError> {
        let req = self.request(Method::POST, "/articles")?;
        let resp = Self::expect_success(req.json(&NewArticle { code }).send().await?).await?;
        Ok(resp.json().await?)
    }

    pub async fn delete_article(&self, id: u64) -> Result<(), ApiError> {
        let req = self.request(Method::DELETE, &format!("/articles/{id}"))?;
        Self::expect_success(req.send().await?).await?;
        Ok(())
    }

    // ── Suppliers ──

    pub async fn list_suppliers(&self, article_id: u64) -> Result<Vec<Supplier>, ApiError> {
        let req = self
            .request(Method::GET, "/suppliers")?
            .query(&[("article_id", article_id)]);
        let resp = Self::expect_success(req.send().await?).await?;
        Ok(resp.json().await?)
    }

    /// Trigger backend supplier discovery for an article (side-effecting:
    /// populates supplier rows server-side).
    pub async fn search_suppliers(&self, article_id: u64) -> Result<(), ApiError> {
        info!(article_id, "requesting supplier discovery");
        let req = self.request(Method::POST, &format!("/search_suppliers/{article_id}"))?;
        Self::expect_success(req.send().await?).await?;
        Ok(())
    }

    /// Delete a supplier. A 404 counts as success so repeated purges and
    /// concurrent sessions stay harmless.
    pub async fn delete_supplier(&self, id: u64) -> Result<(), ApiError> {
        let req = self.request(Method::DELETE, &format!("/suppliers/{id}"))?;
        let resp = req.send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::expect_success(resp).await?;
        Ok(())
    }

    pub async fn set_supplier_email(&self, id: u64, email: &str) -> Result<(), ApiError> {
        let req = self.request(Method::PATCH, &format!("/suppliers/{id}/email"))?;
        Self::expect_success(req.json(&EmailPatch { email }).send().await?).await?;
        Ok(())
    }

    pub async fn set_email_validated(&self, id: u64, valid: bool) -> Result<(), ApiError> {
        let req = self.request(Method::PATCH, &format!("/suppliers/{id}/email_validated"))?;
        Self::expect_success(req.json(&EmailValidatedPatch { valid }).send().await?).await?;
        Ok(())
    }

    // ── External checks ──

    /// Check a batch of websites against WHOIS; returns the subset the
    /// backend confirmed as registered/resolvable.
    pub async fn whois_check(&self, websites: &[String]) -> Result<Vec<String>, ApiError> {
        info!(count = websites.len(), "whois check");
        let req = self.request(Method::POST, "/whois_check")?;
        let resp =
            Self::expect_success(req.json(&WhoisRequest { websites }).send().await?).await?;
        let parsed: WhoisResponse = resp.json().await?;
        Ok(parsed.valid)
    }

    /// Ask the backend's email discovery (LLM-backed) for a supplier's
    /// address. An empty result means "not found".
    pub async fn search_email(
        &self,
        name: &str,
        website: &str,
        country: Option<&str>,
    ) -> Result<Option<String>, ApiError> {
        info!(supplier = name, "email discovery");
        let req = self.request(Method::POST, "/search_email_perplexity")?;
        let payload = EmailSearchRequest {
            name,
            website,
            country: country.unwrap_or(""),
        };
        let resp = Self::expect_success(req.json(&payload).send().await?).await?;
        let parsed: EmailSearchResponse = resp.json().await?;
        let email = parsed.email.trim().to_string();
        Ok(if email.is_empty() { None } else { Some(email) })
    }

    // ── Requests ──

    /// Create a request (invoice) by number. Numbers are unique server-side;
    /// a conflict surfaces as [`ApiError::DuplicateRequestNumber`] rather
    /// than a generic failure.
    pub async fn create_request(&self, number: &str) -> Result<Request, ApiError> {
        let req = self.request(Method::POST, "/requests")?;
        let resp = req.json(&NewRequest { number }).send().await?;
        if resp.status() == StatusCode::CONFLICT {
            return Err(ApiError::DuplicateRequestNumber(number.to_string()));
        }
        let resp = Self::expect_success(resp).await?;
        Ok(resp.json().await?)
    }

    pub async fn list_requests(&self) -> Result<Vec<Request>, ApiError> {
        let req = self.request(Method::GET, "/requests")?;
        let resp = Self::expect_success(req.send().await?).await?;
        Ok(resp.json().await?)
    }

    pub async fn attach_article(&self, request_id: u64, article_id: u64) -> Result<(), ApiError> {
        let req = self.request(
            Method::POST,
            &format!("/requests/{request_id}/articles/{article_id}"),
        )?;
        Self::expect_success(req.send().await?).await?;
        Ok(())
    }

    pub async fn detach_article(&self, request_id: u64, article_id: u64) -> Result<(), ApiError> {
        let req = self.request(
            Method::DELETE,
            &format!("/requests/{request_id}/articles/{article_id}"),
        )?;
        Self::expect_success(req.send().await?).await?;
        Ok(())
    }
}
