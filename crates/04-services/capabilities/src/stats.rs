use std::sync::Arc;

use remoting_abi::StatsReport;
use remoting_config::Config;

/// Pull-based statistics: a request is answered on the next processing pass.
#[derive(Debug)]
pub struct StatsCollector {
    enabled: bool,
    requested: bool,
}

impl StatsCollector {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            requested: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.stats_enabled())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn request(&mut self) {
        self.requested = true;
    }

    pub fn is_requested(&self) -> bool {
        self.requested
    }

    /// Answers an outstanding request with the published report, or an empty
    /// one when collection is off.
    pub fn take<F>(&mut self, published: F) -> Option<Arc<StatsReport>>
    where
        F: FnOnce() -> Arc<StatsReport>,
    {
        if !std::mem::take(&mut self.requested) {
            return None;
        }
        if self.enabled {
            Some(published())
        } else {
            log::debug!("stats requested with the collector disabled");
            Some(Arc::new(StatsReport::default()))
        }
    }
}
