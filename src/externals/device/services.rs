use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::trace;

use crate::{
    internals::ports::{DeviceTransport, Endpoint, TransportError},
    models::snapshot::SnapshotError,
};

/// Talks to the controller's HTTP interface: `GET {base}/{endpoint}` for plain
/// requests and `POST {base}/{endpoint}` with a form body for parameterised ones.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// `timeout` bounds each request, from connect until the body is read.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.as_str()
        )
    }
}

fn request_error(endpoint: Endpoint, e: reqwest::Error) -> TransportError {
    TransportError::Request {
        endpoint: endpoint.as_str(),
        message: e.to_string(),
    }
}

/// Check the status and decode the body. Only `getSensors` must answer with
/// JSON; other endpoints may answer with plain text, which is passed through as
/// a string.
async fn decode(endpoint: Endpoint, response: Response) -> Result<Value, TransportError> {
    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            endpoint: endpoint.as_str(),
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| request_error(endpoint, e))?;
    trace!("'{}' answered {} bytes.", endpoint.as_str(), body.len());
    decode_body(endpoint, &body)
}

fn decode_body(endpoint: Endpoint, body: &str) -> Result<Value, TransportError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_str(body) {
        Ok(value) => Ok(value),
        Err(e) if endpoint == Endpoint::GetSensors => Err(TransportError::Malformed {
            endpoint: endpoint.as_str(),
            source: SnapshotError::Decode(e),
        }),
        Err(_) => Ok(Value::String(body.to_owned())),
    }
}

#[async_trait]
impl DeviceTransport for HttpTransport {
    async fn get(&self, endpoint: Endpoint) -> Result<Value, TransportError> {
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| request_error(endpoint, e))?;
        decode(endpoint, response).await
    }

    async fn post(&self, endpoint: Endpoint, params: Value) -> Result<Value, TransportError> {
        let response = self
            .client
            .post(self.url(endpoint))
            .form(&params)
            .send()
            .await
            .map_err(|e| request_error(endpoint, e))?;
        decode(endpoint, response).await
    }
}
