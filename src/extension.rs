use std::{sync::Arc, time::Duration};

use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{info, instrument};

use crate::{
    blocks::{descriptor::ExtensionDescriptor, host::BlockHost, lang::Localizer},
    internals::{
        cache::{SensorCache, SharedCache},
        ports::DeviceTransport,
        translator::ValueTranslator,
    },
    models::status::{ExtensionStatus, SharedStatus, StatusSlot},
    tasks::poll::task_poll_device,
};

/// A loaded extension: the poll loop is running and block calls are served.
pub struct Extension {
    cache: SharedCache,
    status: SharedStatus,
    host: BlockHost,
    descriptor: ExtensionDescriptor,
    token: CancellationToken,
    tracker: TaskTracker,
}

impl Extension {
    /// Reset the device, then start polling it every `period`.
    /// Must be called from within a tokio runtime.
    #[instrument(skip_all)]
    pub fn load(
        transport: Arc<dyn DeviceTransport>,
        lang: Arc<dyn Localizer>,
        period: Duration,
    ) -> Self {
        let cache = SensorCache::shared();
        let status = StatusSlot::shared();
        let descriptor = ExtensionDescriptor::build(&*lang);
        let translator = ValueTranslator::new(cache.clone(), transport.clone());
        translator.reset();

        let token = CancellationToken::new();
        let tracker = TaskTracker::new();
        tracker.spawn(task_poll_device(
            token.clone(),
            transport,
            cache.clone(),
            status.clone(),
            period,
        ));
        info!("Loaded '{}', polling every {:?}.", descriptor.name, period);

        Self {
            cache,
            status,
            host: BlockHost::new(translator, lang),
            descriptor,
            token,
            tracker,
        }
    }

    pub fn status(&self) -> ExtensionStatus {
        self.status.read().status().clone()
    }

    pub fn descriptor(&self) -> &ExtensionDescriptor {
        &self.descriptor
    }

    pub fn host(&self) -> &BlockHost {
        &self.host
    }

    /// Stop polling, let outstanding requests finish and drop the readings.
    #[instrument(skip_all)]
    pub async fn unload(self) {
        self.token.cancel();
        self.tracker.close();
        self.tracker.wait().await;
        self.host.translator().settle().await;
        self.cache.write().reset();
        info!("Unloaded.");
    }
}
