use log::{debug, info, log_enabled, warn, Level};

/// Component-labelled wrapper over the `log` facade.
pub struct LogManager {
    component: &'static str,
}

impl LogManager {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.component, message);
    }

    /// Debug output; `message` only runs when debug logging is enabled.
    pub fn detail<F>(&self, message: F)
    where
        F: FnOnce() -> String,
    {
        if log_enabled!(Level::Debug) {
            debug!("[{}] {}", self.component, message());
        }
    }

    pub fn caution(&self, message: &str) {
        warn!("[{}] {}", self.component, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("pipeline")
    }
}
