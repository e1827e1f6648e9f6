//! Article removal semantics under a request filter.

use procura_client::ApiClient;
use tracing::info;

use crate::PipelineError;

/// Remove an article from the current view.
///
/// With an active request filter this only detaches the article from that
/// request; without one it deletes the article itself.
pub async fn remove_article(
    client: &ApiClient,
    article_id: u64,
    active_request: Option<u64>,
) -> Result<(), PipelineError> {
    match active_request {
        Some(request_id) => {
            info!(article_id, request_id, "detaching article from request");
            client.detach_article(request_id, article_id).await?;
        }
        None => {
            info!(article_id, "deleting article");
            client.delete_article(article_id).await?;
        }
    }
    Ok(())
}
