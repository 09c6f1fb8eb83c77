use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use tracing::debug;

use super::applications::payload::{MultipartPayload, PartValue};
use super::gateway::{GatewayError, GatewayResponse, IntakeGateway};
use crate::config::EndpointConfig;

/// reqwest-backed adapter for the course listing and intake endpoints. Requests use the client's
/// default timeouts.
#[derive(Debug, Clone)]
pub struct HttpIntakeGateway {
    client: Client,
    courses_url: Url,
    applications_url: Url,
}

impl HttpIntakeGateway {
    pub fn new(endpoints: &EndpointConfig) -> Result<Self, GatewayError> {
        let courses_url = endpoints
            .courses_url()
            .map_err(|err| GatewayError::Endpoint(err.to_string()))?;
        let applications_url = endpoints
            .applications_url()
            .map_err(|err| GatewayError::Endpoint(err.to_string()))?;

        Ok(Self::with_client(Client::new(), courses_url, applications_url))
    }

    pub fn with_client(client: Client, courses_url: Url, applications_url: Url) -> Self {
        Self {
            client,
            courses_url,
            applications_url,
        }
    }

    async fn multipart_form(payload: MultipartPayload) -> Result<Form, GatewayError> {
        let mut form = Form::new();

        for part in payload.into_parts() {
            let name = part.name.as_str();
            form = match part.value {
                PartValue::Text(text) => form.text(name, text),
                PartValue::File(upload) => {
                    let bytes = upload
                        .read_bytes()
                        .await
                        .map_err(|source| GatewayError::Attachment {
                            field: part.name,
                            source,
                        })?;
                    let file_part = Part::bytes(bytes)
                        .file_name(upload.file_name().to_string())
                        .mime_str(upload.content_type().as_ref())
                        .map_err(transport)?;
                    form.part(name, file_part)
                }
            };
        }

        Ok(form)
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}

async fn into_gateway_response(response: Response) -> Result<GatewayResponse, GatewayError> {
    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(transport)?;
    Ok(GatewayResponse::new(status, body.to_vec()))
}

#[async_trait]
impl IntakeGateway for HttpIntakeGateway {
    async fn list_courses(&self) -> Result<GatewayResponse, GatewayError> {
        debug!(url = %self.courses_url, "requesting course catalog");
        let response = self
            .client
            .get(self.courses_url.clone())
            .send()
            .await
            .map_err(transport)?;
        into_gateway_response(response).await
    }

    async fn create_application(
        &self,
        payload: MultipartPayload,
    ) -> Result<GatewayResponse, GatewayError> {
        debug!(url = %self.applications_url, parts = payload.len(), "posting application");
        let form = Self::multipart_form(payload).await?;
        let response = self
            .client
            .post(self.applications_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        into_gateway_response(response).await
    }
}
