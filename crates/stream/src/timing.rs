use std::time::Duration;

/// Wall time of each pipeline stage for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageTimings {
    pub simulate: Duration,
    pub select: Duration,
    pub diff: Duration,
    pub apply: Duration,
}

impl StageTimings {
    pub fn total(&self) -> Duration {
        self.simulate + self.select + self.diff + self.apply
    }
}

/// Rolling window of recent frame timings.
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<StageTimings>,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: vec![StageTimings::default(); capacity.max(1)],
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, timings: StageTimings) {
        self.history[self.index] = timings;
        self.index = (self.index + 1) % self.history.len();
        if self.index == 0 {
            self.filled = true;
        }
    }

    pub fn count(&self) -> usize {
        if self.filled { self.history.len() } else { self.index }
    }

    fn recorded(&self) -> &[StageTimings] {
        &self.history[..self.count()]
    }

    /// Per-stage mean over the window.
    pub fn average(&self) -> StageTimings {
        let frames = self.recorded();
        if frames.is_empty() {
            return StageTimings::default();
        }
        let n = frames.len() as u32;
        let sum = |f: fn(&StageTimings) -> Duration| frames.iter().map(f).sum::<Duration>() / n;
        StageTimings {
            simulate: sum(|t| t.simulate),
            select: sum(|t| t.select),
            diff: sum(|t| t.diff),
            apply: sum(|t| t.apply),
        }
    }

    /// Slowest frame total in the window.
    pub fn worst(&self) -> Duration {
        self.recorded()
            .iter()
            .map(StageTimings::total)
            .max()
            .unwrap_or(Duration::ZERO)
    }
}
