use std::time::{Duration, Instant};

/// Wall-clock durations of named stages, in the order they ran.
#[derive(Default)]
pub struct StageTimer {
    stages: Vec<(&'static str, Duration)>,
}

impl StageTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `op` and record how long it took under `label`.
    pub fn time<T>(&mut self, label: &'static str, op: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = op();
        self.stages.push((label, start.elapsed()));
        out
    }

    pub fn stages(&self) -> &[(&'static str, Duration)] {
        &self.stages
    }

    pub fn total(&self) -> Duration {
        self.stages.iter().map(|(_, d)| *d).sum()
    }
}
