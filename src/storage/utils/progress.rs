use std::cell::Cell;

/// Logs transfer percentage once every `step_bytes`.
///
/// Records go through `log::info!`, never stdout. Small transfers that
/// never cross a step log nothing at all.
pub struct ConsoleProgressReporter {
    label: String,
    total_bytes: u64,
    step_bytes: u64,
    next_report: Cell<u64>,
    reported: Cell<bool>,
}

impl ConsoleProgressReporter {
    pub fn new(label: impl Into<String>, total_bytes: u64, step_bytes: u64) -> Self {
        let step_bytes = step_bytes.max(1);
        Self {
            label: label.into(),
            total_bytes,
            step_bytes,
            next_report: Cell::new(step_bytes),
            reported: Cell::new(false),
        }
    }

    /// Log progress if a reporting threshold has been reached.
    pub fn maybe_report(&self, processed_bytes: u64) {
        if self.total_bytes == 0 || processed_bytes < self.next_report.get() {
            return;
        }
        let progress = (processed_bytes.min(self.total_bytes) * 100 / self.total_bytes) as u32;
        log::info!("{}: {}%", self.label, progress);
        self.reported.set(true);
        self.next_report
            .set((processed_bytes / self.step_bytes + 1) * self.step_bytes);
    }

    /// Log completion if any intermediate progress was logged.
    pub fn finish(&self) {
        if self.has_reported() {
            log::info!("{}: done", self.label);
        }
    }

    pub fn has_reported(&self) -> bool {
        self.reported.get()
    }
}
