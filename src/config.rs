use std::time::Duration;

/// Name of the label that protects a pull request from being closed automatically.
pub const DEFAULT_KEEP_OPEN_LABEL: &str = "keep-open";

/// Configuration of the stale pull request sweeper.
#[derive(Clone, Debug)]
pub struct StalePrsConfig {
    /// Whether stale pull requests are actually closed, or only warned about.
    pub close_enabled: bool,
    /// Inactivity after which a pull request gets closed.
    pub close_after: Duration,
    /// Inactivity after which a warning is posted on a pull request.
    /// It should not be larger than `close_after`.
    pub warn_after: Duration,
    pub keep_open_label: String,
}

impl StalePrsConfig {
    pub fn new(close_enabled: bool, warn_after: Duration, close_after: Duration) -> Self {
        Self {
            close_enabled,
            close_after,
            warn_after,
            keep_open_label: DEFAULT_KEEP_OPEN_LABEL.to_string(),
        }
    }

    pub fn keep_open_label(mut self, label: String) -> Self {
        self.keep_open_label = label;
        self
    }

    /// The warning is meant to be posted before the pull request is closed.
    pub fn has_ordered_thresholds(&self) -> bool {
        self.warn_after <= self.close_after
    }
}
