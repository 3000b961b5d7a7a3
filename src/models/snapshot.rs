use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// One `getSensors` reading. Channel fields the device did not send (or sent
/// as something other than a finite number) are `None`. Anything else in the payload
/// is carried along untouched in `other`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    #[serde(default, deserialize_with = "lenient_percent")]
    pub ax_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient_percent")]
    pub ay_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient_percent")]
    pub a1_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient_percent")]
    pub m1_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient_percent")]
    pub m2_percent: Option<f64>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Sensor payload is not a JSON object: {0}")]
    NotAnObject(Value),

    #[error("Failed to decode sensor payload. Error: {0}")]
    Decode(#[from] serde_json::Error),
}

fn lenient_percent<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let percent = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(percent.filter(|v| v.is_finite()))
}

impl TryFrom<Value> for SensorSnapshot {
    type Error = SnapshotError;

    /// Anything but a JSON object is rejected outright.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if !value.is_object() {
            return Err(SnapshotError::NotAnObject(value));
        }
        Ok(serde_json::from_value(value)?)
    }
}

impl Display for SensorSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn show(v: Option<f64>) -> String {
            v.map(|v| format!("{}%", v)).unwrap_or_else(|| "-".into())
        }
        write!(
            f,
            "(SensorSnapshot: I1={}, I2={}, I3={}, M1={}, M2={})",
            show(self.ax_percent),
            show(self.ay_percent),
            show(self.a1_percent),
            show(self.m1_percent),
            show(self.m2_percent)
        )
    }
}
