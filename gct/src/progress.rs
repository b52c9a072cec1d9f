//! Progress reporting for long reads
//!
//! Readers report `(phase, current, total)` while scanning and call
//! [`Progress::finish`] once a phase completes. Reporting never changes
//! results; pass [`NoProgress`] when nothing should be reported.

/// Receiver of progress updates during long scans
pub trait Progress {
    /// Called with the phase name, the 0-based item being processed and the item total
    fn update(&mut self, phase: &str, current: usize, total: usize);

    /// Called once when the phase completes
    fn finish(&mut self) {}
}

/// Progress receiver that discards every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn update(&mut self, _phase: &str, _current: usize, _total: usize) {}
}

/// Any `FnMut(phase, current, total)` closure can receive updates
impl<F> Progress for F
where
    F: FnMut(&str, usize, usize),
{
    fn update(&mut self, phase: &str, current: usize, total: usize) {
        self(phase, current, total)
    }
}

/// Progress receiver that writes percentage steps to the `log` facade
#[derive(Debug, Clone)]
pub struct LogProgress {
    step_percent: usize,
    last_reported: Option<usize>,
}

impl LogProgress {
    /// Report every `step_percent` percent (clamped to 1..=100)
    pub fn new(step_percent: usize) -> Self {
        Self {
            step_percent: step_percent.clamp(1, 100),
            last_reported: None,
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Progress for LogProgress {
    fn update(&mut self, phase: &str, current: usize, total: usize) {
        if total == 0 {
            return;
        }
        let percent = (current + 1).min(total) * 100 / total;
        let bucket = percent / self.step_percent;
        if self.last_reported != Some(bucket) {
            self.last_reported = Some(bucket);
            log::debug!("{phase}: {percent}% ({}/{total})", current + 1);
        }
    }

    fn finish(&mut self) {
        self.last_reported = None;
    }
}
