use std::sync::Arc;

use serde_json::json;
use tokio::sync::Mutex;
use tokio_util::task::TaskTracker;
use tracing::{debug, trace, warn};

use crate::models::{
    channel::{InputChannel, OutputChannel},
    direction::{ButtonState, LightBarrierState, MotorDirection},
    magnitude::{logical_to_percent, percent_to_logical, OutputPercent},
};

use super::{
    cache::SharedCache,
    ports::{DeviceTransport, Endpoint},
};

/// Percentage points separating "on" from "off" and a real edge from noise.
pub const EDGE_THRESHOLD: f64 = 15f64;

/// Turns block-level calls into cache lookups and device requests.
///
/// Reads never touch the device. Writes are spawned and not awaited; their
/// failures are logged and otherwise dropped.
#[derive(Clone)]
pub struct ValueTranslator {
    cache: SharedCache,
    transport: Arc<dyn DeviceTransport>,
    writes: TaskTracker,
    /// Shared by all clones so only one `settle` closes the tracker at a time.
    settling: Arc<Mutex<()>>,
}

/// Reopens the write tracker when a `settle` ends, even if it is dropped early.
struct Reopen<'a>(&'a TaskTracker);

impl Drop for Reopen<'_> {
    fn drop(&mut self) {
        self.0.reopen();
    }
}

impl ValueTranslator {
    pub fn new(cache: SharedCache, transport: Arc<dyn DeviceTransport>) -> Self {
        Self {
            cache,
            transport,
            writes: TaskTracker::new(),
            settling: Arc::new(Mutex::new(())),
        }
    }

    /// Current percentage of `channel`, 0 before the first reading.
    pub fn input_percent(&self, channel: InputChannel) -> f64 {
        self.cache
            .read()
            .current()
            .and_then(|snapshot| channel.read(snapshot))
            .unwrap_or(0f64)
    }

    /// Change of `channel` between the two cached readings.
    /// `None` until two readings carrying this channel exist.
    pub fn input_delta(&self, channel: InputChannel) -> Option<f64> {
        let cache = self.cache.read();
        let current = channel.read(cache.current()?)?;
        let previous = channel.read(cache.previous()?)?;
        Some(current - previous)
    }

    /// A closed button pulls the input low.
    pub fn button_binary(&self, channel: InputChannel) -> bool {
        self.input_percent(channel) < EDGE_THRESHOLD
    }

    /// A lit photo transistor pulls the input high.
    pub fn light_barrier_binary(&self, channel: InputChannel) -> bool {
        self.input_percent(channel) > EDGE_THRESHOLD
    }

    /// Whether the last poll saw `channel` move in the direction of `state`.
    ///
    /// NOTE: `Released` compares `delta < +15`, not `delta > +15`, so it also
    /// fires while nothing changes. Existing block programs depend on this,
    /// so it stays as is; the tests pin it.
    pub fn on_button_edge(&self, channel: InputChannel, state: ButtonState) -> bool {
        let Some(delta) = self.input_delta(channel) else {
            return false;
        };
        match state {
            ButtonState::Pressed => delta < -EDGE_THRESHOLD,
            ButtonState::Released => delta < EDGE_THRESHOLD,
        }
    }

    /// Light-barrier counterpart of [`ValueTranslator::on_button_edge`].
    /// `Closes` carries the same `delta < +15` comparison.
    pub fn on_light_barrier_edge(&self, channel: InputChannel, state: LightBarrierState) -> bool {
        let Some(delta) = self.input_delta(channel) else {
            return false;
        };
        match state {
            LightBarrierState::Opens => delta < -EDGE_THRESHOLD,
            LightBarrierState::Closes => delta < EDGE_THRESHOLD,
        }
    }

    /// Output percentage last reported by the device, 0 before the first reading.
    pub fn output_percent(&self, channel: OutputChannel) -> f64 {
        self.cache
            .read()
            .current()
            .and_then(|snapshot| channel.read(snapshot))
            .unwrap_or(0f64)
    }

    /// Drive `channel` at `percent` (rounded, clamped to [-100, 100]).
    pub fn set_output_percent(&self, channel: OutputChannel, percent: f64) {
        let speed = OutputPercent::saturating(percent);
        debug!("Setting {} to {}.", channel, speed);
        let params = json!({ "idx": channel.index(), "speed": speed.value() });
        self.spawn_write(Endpoint::SetOutput, Some(params));
    }

    /// Output of `channel` on the block scale [-8, 8].
    pub fn output_value(&self, channel: OutputChannel) -> i32 {
        percent_to_logical(self.output_percent(channel))
    }

    /// Drive `channel` at `value` on the block scale [-8, 8].
    pub fn set_output_value(&self, channel: OutputChannel, value: f64) {
        self.set_output_percent(channel, logical_to_percent(value));
    }

    pub fn set_lamp_value(&self, channel: OutputChannel, value: f64) {
        self.set_output_value(channel, value);
    }

    pub fn set_motor_value_direction(
        &self,
        channel: OutputChannel,
        speed: f64,
        direction: MotorDirection,
    ) {
        self.set_output_value(channel, direction.signed(speed));
    }

    /// Keep the motor's current speed, change only its direction.
    pub fn set_motor_direction(&self, channel: OutputChannel, direction: MotorDirection) {
        let speed = self.output_value(channel).abs() as f64;
        self.set_output_value(channel, direction.signed(speed));
    }

    /// Ask the device to stop all outputs. Local state is left alone.
    pub fn reset(&self) {
        debug!("Resetting device.");
        self.spawn_write(Endpoint::Reset, None);
    }

    /// Wait until every write issued so far has completed. Writes issued while
    /// waiting are waited for as well. Concurrent callers, clones included,
    /// settle one after another.
    pub async fn settle(&self) {
        let _turn = self.settling.lock().await;
        let _reopen = Reopen(&self.writes);
        self.writes.close();
        self.writes.wait().await;
    }

    fn spawn_write(&self, endpoint: Endpoint, params: Option<serde_json::Value>) {
        let transport = self.transport.clone();
        self.writes.spawn(async move {
            let result = match params {
                Some(params) => transport.post(endpoint, params).await,
                None => transport.get(endpoint).await,
            };
            match result {
                Ok(_) => trace!("'{}' acknowledged.", endpoint.as_str()),
                Err(e) => warn!("Failed to send '{}'. Error: {}", endpoint.as_str(), e),
            }
        });
    }
}
