use std::{sync::Arc, time::Duration};

use tokio::time::MissedTickBehavior;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{debug, info, trace, warn};

use crate::{
    internals::{
        cache::SharedCache,
        ports::{DeviceTransport, Endpoint, TransportError},
    },
    models::{
        snapshot::SensorSnapshot,
        status::{ExtensionStatus, SharedStatus},
    },
};

/// Default time between two `getSensors` requests.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(55);

/// Task: Runs periodically to fetch the device's sensor readings into the cache.
/// Every tick issues a request without waiting for the previous one, so requests
/// may overlap; completions older than what the cache holds are dropped.
/// Can be cancelled. Waits for outstanding requests before returning.
#[tracing::instrument(skip_all)]
pub async fn task_poll_device(
    token: CancellationToken,
    transport: Arc<dyn DeviceTransport>,
    cache: SharedCache,
    status: SharedStatus,
    period: Duration,
) {
    info!("Started.");
    let requests = TaskTracker::new();
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut seq: u64 = 0;

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                warn!("Cancelled.");
                break;
            },
            _ = ticker.tick() => {
                seq += 1;
                requests.spawn(business_logic(
                    seq,
                    transport.clone(),
                    cache.clone(),
                    status.clone(),
                ));
            }
        };
    }

    requests.close();
    requests.wait().await;
    debug!("All outstanding poll requests finished.");
}

/// Perform task business logic.
/// Fetch one reading and record the outcome in the cache and status.
async fn business_logic(
    seq: u64,
    transport: Arc<dyn DeviceTransport>,
    cache: SharedCache,
    status: SharedStatus,
) {
    trace!("Executing business logic.");
    match poll_once(seq, transport.as_ref(), &cache).await {
        Ok(true) => {
            status.write().record(seq, ExtensionStatus::Ready);
        }
        Ok(false) => {
            debug!("Dropped stale reading #{}.", seq);
        }
        Err(e) => {
            warn!("Failed to poll sensors. Error: {}", e);
            if !status.write().record(seq, ExtensionStatus::Error(e.to_string())) {
                debug!("Ignored failure of superseded request #{}.", seq);
            }
        }
    }
}

/// Fetch one reading and ingest it as request number `seq`.
/// Returns whether the reading made it into the cache.
pub async fn poll_once(
    seq: u64,
    transport: &dyn DeviceTransport,
    cache: &SharedCache,
) -> Result<bool, TransportError> {
    let payload = transport.get(Endpoint::GetSensors).await?;
    let snapshot =
        SensorSnapshot::try_from(payload).map_err(|source| TransportError::Malformed {
            endpoint: Endpoint::GetSensors.as_str(),
            source,
        })?;
    trace!("Got reading #{}: {}", seq, snapshot);
    Ok(cache.write().ingest_sequenced(seq, snapshot))
}
