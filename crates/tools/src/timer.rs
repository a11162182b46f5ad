use std::time::{Duration, Instant};

use folio_session::Session;

/// Rolling window of frame durations.
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<Duration>,
    next: usize,
    filled: bool,
    substeps: u64,
    frames: u64,
}

/// Timing figures for the current window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Frames recorded over the timer's whole life.
    pub frames: u64,
    /// Fixed sub-steps summed over the timer's whole life.
    pub substeps: u64,
    pub average: Duration,
    pub min: Duration,
    pub max: Duration,
}

impl std::fmt::Display for FrameStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frames={} substeps={} avg={:?} min={:?} max={:?}",
            self.frames, self.substeps, self.average, self.min, self.max
        )
    }
}

impl FrameTimer {
    /// A window of `capacity` frames (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            history: vec![Duration::ZERO; capacity.max(1)],
            next: 0,
            filled: false,
            substeps: 0,
            frames: 0,
        }
    }

    pub fn record(&mut self, dt: Duration, substeps: u32) {
        self.history[self.next] = dt;
        self.next = (self.next + 1) % self.history.len();
        if self.next == 0 {
            self.filled = true;
        }
        self.frames += 1;
        self.substeps += u64::from(substeps);
    }

    /// Run one session frame and record how long it took.
    pub fn time_frame(&mut self, session: &mut Session, elapsed: f32) -> Duration {
        let start = Instant::now();
        session.frame(elapsed);
        let dt = start.elapsed();
        self.record(dt, session.last_substeps());
        tracing::trace!(?dt, substeps = session.last_substeps(), "frame timed");
        dt
    }

    /// Frames currently held in the window.
    pub fn count(&self) -> usize {
        if self.filled {
            self.history.len()
        } else {
            self.next
        }
    }

    pub fn stats(&self) -> FrameStats {
        let window = &self.history[..self.count()];
        let average = if window.is_empty() {
            Duration::ZERO
        } else {
            window.iter().sum::<Duration>() / window.len() as u32
        };
        FrameStats {
            frames: self.frames,
            substeps: self.substeps,
            average,
            min: window.iter().copied().min().unwrap_or_default(),
            max: window.iter().copied().max().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_assets::{LoadedScene, demo_scene};
    use folio_session::SessionConfig;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn empty_timer_reports_zero() {
        let timer = FrameTimer::new(4);
        assert_eq!(timer.count(), 0);
        assert_eq!(timer.stats(), FrameStats::default());
    }

    #[test]
    fn window_rolls_over() {
        let mut timer = FrameTimer::new(3);
        for n in [10, 20, 30, 40] {
            timer.record(ms(n), 1);
        }
        assert_eq!(timer.count(), 3);
        let stats = timer.stats();
        assert_eq!(stats.frames, 4);
        assert_eq!(stats.substeps, 4);
        assert_eq!(stats.min, ms(20));
        assert_eq!(stats.max, ms(40));
        assert_eq!(stats.average, ms(30));
    }

    #[test]
    fn zero_capacity_still_records() {
        let mut timer = FrameTimer::new(0);
        timer.record(ms(5), 0);
        assert_eq!(timer.count(), 1);
        assert_eq!(timer.stats().max, ms(5));
    }

    #[test]
    fn timing_a_session_counts_substeps() {
        let mut session = Session::new(
            SessionConfig::demo(),
            LoadedScene::from_document(&demo_scene()),
        );
        let mut timer = FrameTimer::new(8);
        let dt = session.config().physics.fixed_dt;
        for _ in 0..3 {
            timer.time_frame(&mut session, dt * 2.0);
        }
        let stats = timer.stats();
        assert_eq!(stats.frames, 3);
        assert_eq!(session.frames(), 3);
        assert!(stats.substeps >= 3);
        assert!(stats.to_string().starts_with("frames=3 "));
    }
}
