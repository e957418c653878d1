// probity-core/src/ports/http.rs

use crate::domain::payload::{HttpRequest, HttpResponse};
use crate::error::ProbityError;
use async_trait::async_trait;

/// Network collaborator of HTTP checks. Any `Err` is treated as a fetch
/// failure of the check, never as a crash of the run.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ProbityError>;
}
