use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{ensure, Context};
use parking_lot::Mutex;
use session::Connector;
use transport_codecs::frame_envelope;
use transport_fabric::{LinkSpec, WorkerRuntime};

use crate::fabric::Fabric;
use crate::peer::LoopbackConnector;
use crate::pump::PumpEngine;

const DEFAULT_IDLE_SLEEP: Duration = Duration::from_micros(200);
const DEFAULT_MAX_BATCH: usize = 64;

/// Configures a [`LoopbackNetwork`] before its transport thread starts.
#[derive(Clone, Debug)]
pub struct LoopbackBuilder {
    idle_sleep: Duration,
    max_batch: usize,
    link: LinkSpec,
}

impl Default for LoopbackBuilder {
    fn default() -> Self {
        Self {
            idle_sleep: DEFAULT_IDLE_SLEEP,
            max_batch: DEFAULT_MAX_BATCH,
            link: LinkSpec {
                coalesce_envelope: frame_envelope(),
                ..LinkSpec::default()
            },
        }
    }
}

impl LoopbackBuilder {
    /// Sleep between transport rounds that moved nothing.
    #[must_use]
    pub fn idle_sleep(mut self, idle_sleep: Duration) -> Self {
        self.idle_sleep = idle_sleep;
        self
    }

    /// Packets relayed per port class and direction in one round.
    #[must_use]
    pub fn max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch;
        self
    }

    /// Byte budgets of each session's link to the transport thread.
    #[must_use]
    pub fn link(mut self, link: LinkSpec) -> Self {
        self.link = LinkSpec {
            coalesce_envelope: frame_envelope(),
            ..link
        };
        self
    }

    /// Starts the transport thread.
    pub fn build(self) -> anyhow::Result<LoopbackNetwork> {
        ensure!(self.max_batch > 0, "max_batch must be positive");
        ensure!(
            self.link.lossless_bytes > 0
                && self.link.besteffort_bytes > 0
                && self.link.coalesce_bytes > 0,
            "link byte budgets must be positive"
        );

        let fabric = Arc::new(Mutex::new(Fabric::new()));
        let stop = Arc::new(AtomicBool::new(false));
        let mut runtime = WorkerRuntime::new();
        runtime.register(PumpEngine::new(Arc::clone(&fabric), self.max_batch));

        let thread_stop = Arc::clone(&stop);
        let idle_sleep = self.idle_sleep;
        let worker = thread::Builder::new()
            .name("remoting-loopback".into())
            .spawn(move || runtime.run_until(&thread_stop, idle_sleep))
            .context("spawn loopback transport thread")?;

        Ok(LoopbackNetwork {
            connector: LoopbackConnector::new(Arc::clone(&fabric), self.link),
            fabric,
            stop,
            worker: Some(worker),
        })
    }
}

/// One server/client pair joined by an in-process transport thread.
///
/// Dropping the network stops the thread; sessions still open afterwards
/// keep their state but no longer exchange packets.
pub struct LoopbackNetwork {
    connector: LoopbackConnector,
    fabric: Arc<Mutex<Fabric>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl LoopbackNetwork {
    /// Returns a builder with default settings.
    pub fn builder() -> LoopbackBuilder {
        LoopbackBuilder::default()
    }

    /// Starts a network with default settings.
    pub fn start() -> anyhow::Result<Self> {
        Self::builder().build()
    }

    /// Connector for both roles, shareable across API tables.
    pub fn connector(&self) -> Arc<dyn Connector> {
        Arc::new(self.connector.clone())
    }

    /// Whether both sides finished negotiating and packets flow.
    pub fn is_linked(&self) -> bool {
        self.fabric.lock().linked
    }
}

impl Drop for LoopbackNetwork {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("loopback transport thread panicked");
            }
        }
    }
}
