use crate::error::NotifyError;
use reqwest::Client;
use tracing::{debug, info};

/// Fixed event-ingestion endpoint.
pub const EVENTS_ENDPOINT: &str = "https://events.pagerduty.com/v2/enqueue";

/// What came back from the endpoint. Recorded for diagnostics only; the
/// status never drives control flow.
#[derive(Debug)]
pub struct DeliveryReceipt {
    pub status: u16,
    pub body: String,
}

pub struct Deliverer {
    client: Client,
    endpoint: String,
}

impl Deliverer {
    /// Transport defaults only -- no timeout override is configured.
    pub fn new() -> Result<Self, NotifyError> {
        let client = Client::builder().build().map_err(NotifyError::HttpClient)?;
        Ok(Self {
            client,
            endpoint: EVENTS_ENDPOINT.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Issue the one POST of this invocation. The body is the pre-serialized
    /// payload, sent as-is. No retry on failure; transport errors propagate
    /// to the caller.
    pub async fn deliver(&self, payload: &str) -> Result<DeliveryReceipt, NotifyError> {
        info!("Delivering event to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .header("Accept-Charset", "UTF-8")
            .body(payload.to_string())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown response body".to_string());
        debug!("Response received: HTTP {} {}", status, body);

        Ok(DeliveryReceipt { status, body })
    }
}
