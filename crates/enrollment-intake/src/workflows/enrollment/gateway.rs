use async_trait::async_trait;

use super::applications::domain::FieldName;
use super::applications::payload::MultipartPayload;

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl GatewayResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to complete an exchange at all. HTTP error statuses are not gateway errors.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("request to intake service failed: {0}")]
    Transport(String),
    #[error("could not read attachment for {field}: {source}")]
    Attachment {
        field: FieldName,
        #[source]
        source: std::io::Error,
    },
    #[error("intake endpoint misconfigured: {0}")]
    Endpoint(String),
}

/// Remote course listing and application intake endpoints.
#[async_trait]
pub trait IntakeGateway: Send + Sync {
    async fn list_courses(&self) -> Result<GatewayResponse, GatewayError>;

    async fn create_application(
        &self,
        payload: MultipartPayload,
    ) -> Result<GatewayResponse, GatewayError>;
}
