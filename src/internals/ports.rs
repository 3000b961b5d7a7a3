use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::snapshot::SnapshotError;

/// Named device endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Reset,
    GetSensors,
    SetOutput,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Reset => "reset",
            Endpoint::GetSensors => "getSensors",
            Endpoint::SetOutput => "setOutput",
        }
    }
}

#[derive(Error, Debug)]
pub enum TransportError {
    /// The device could not be reached or the request did not complete.
    #[error("Request to '{endpoint}' failed. Error: {message}")]
    Request {
        endpoint: &'static str,
        message: String,
    },

    /// The device answered with a non-success status.
    #[error("Device answered '{endpoint}' with status {status}.")]
    Status { endpoint: &'static str, status: u16 },

    /// The device answered, but not with something we can use.
    #[error("Malformed answer from '{endpoint}'. Error: {source}")]
    Malformed {
        endpoint: &'static str,
        #[source]
        source: SnapshotError,
    },
}

/// This port separates talking to the controller from the translation logic,
/// which keeps the latter testable without a device.
#[async_trait]
pub trait DeviceTransport: Send + Sync + 'static {
    /// Issue a request without parameters and return the decoded JSON answer.
    /// An empty answer body decodes to `Value::Null`.
    async fn get(&self, endpoint: Endpoint) -> Result<Value, TransportError>;

    /// Issue a request carrying `params` (a flat JSON object).
    async fn post(&self, endpoint: Endpoint, params: Value) -> Result<Value, TransportError>;
}
