//! The remote generation seam.

use async_trait::async_trait;

use crate::prompt::GenerateRequest;

/// A backend that turns a [`GenerateRequest`] into report text.
///
/// `Ok(None)` means the backend answered without a result. The session
/// treats that the same as a fault.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<Option<String>>;
}
