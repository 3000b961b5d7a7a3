//! In-memory stand-in for the controller, used by the unit tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};

use crate::internals::ports::{DeviceTransport, Endpoint, TransportError};

/// Records every request and answers `getSensors` with the inputs set by the
/// test plus the output speeds it was last told to drive.
#[derive(Default)]
pub struct FakeDevice {
    inputs: Mutex<Map<String, Value>>,
    outputs: Mutex<[i64; 2]>,
    requests: Mutex<Vec<(Endpoint, Value)>>,
    offline: AtomicBool,
    raw_answer: Mutex<Option<Value>>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&self, field: &str, percent: f64) {
        self.inputs.lock().insert(field.into(), json!(percent));
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Answer every following `getSensors` with `value` verbatim.
    pub fn answer_raw(&self, value: Value) {
        *self.raw_answer.lock() = Some(value);
    }

    pub fn requests(&self) -> Vec<(Endpoint, Value)> {
        self.requests.lock().clone()
    }

    /// Speeds sent with `setOutput`, in order, as `(idx, speed)`.
    pub fn sent_speeds(&self) -> Vec<(i64, i64)> {
        self.requests
            .lock()
            .iter()
            .filter(|(endpoint, _)| *endpoint == Endpoint::SetOutput)
            .map(|(_, params)| {
                (
                    params["idx"].as_i64().unwrap_or(-1),
                    params["speed"].as_i64().unwrap_or(i64::MIN),
                )
            })
            .collect()
    }

    fn check_online(&self, endpoint: Endpoint) -> Result<(), TransportError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(TransportError::Request {
                endpoint: endpoint.as_str(),
                message: "device offline".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DeviceTransport for FakeDevice {
    async fn get(&self, endpoint: Endpoint) -> Result<Value, TransportError> {
        self.requests.lock().push((endpoint, Value::Null));
        self.check_online(endpoint)?;
        match endpoint {
            Endpoint::GetSensors => {
                if let Some(raw) = self.raw_answer.lock().clone() {
                    return Ok(raw);
                }
                let mut answer = self.inputs.lock().clone();
                let outputs = *self.outputs.lock();
                answer.insert("m1_percent".into(), json!(outputs[0]));
                answer.insert("m2_percent".into(), json!(outputs[1]));
                Ok(Value::Object(answer))
            }
            Endpoint::Reset => {
                *self.outputs.lock() = [0, 0];
                Ok(Value::Null)
            }
            Endpoint::SetOutput => Ok(Value::Null),
        }
    }

    async fn post(&self, endpoint: Endpoint, params: Value) -> Result<Value, TransportError> {
        self.requests.lock().push((endpoint, params.clone()));
        self.check_online(endpoint)?;
        if endpoint == Endpoint::SetOutput {
            if let (Some(idx), Some(speed)) = (params["idx"].as_u64(), params["speed"].as_i64()) {
                if let Some(slot) = self.outputs.lock().get_mut(idx as usize) {
                    *slot = speed;
                }
            }
        }
        Ok(Value::Null)
    }
}
