//! Two-phase gauge animation.
//!
//! Every run sweeps the displayed value from 0 up to 100, then eases back
//! down to the target. The driver never reads a clock: the host hands it the
//! timestamp of each display frame, so tests can step time explicitly.

use std::time::{Duration, Instant};

use super::geometry::{clamp_percent, rotation};

/// Duration of the 0 -> 100 sweep.
pub const RISE_DURATION: Duration = Duration::from_millis(800);
/// Duration of the 100 -> target settle.
pub const SETTLE_DURATION: Duration = Duration::from_millis(1200);
/// Length of a full run.
pub const TOTAL_DURATION: Duration = Duration::from_millis(2000);

/// Ease-out cubic: fast start, slow finish. `progress` is clamped to [0, 1].
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Eased interpolation between `from` and `to`.
pub fn interpolate(from: f64, to: f64, progress: f64) -> f64 {
    from + (to - from) * ease_out_cubic(progress)
}

/// Displayed value `elapsed` into a run towards `target`.
pub fn value_at(target: f64, elapsed: Duration) -> f64 {
    let target = clamp_percent(target);

    if elapsed < RISE_DURATION {
        interpolate(0.0, 100.0, progress(elapsed, RISE_DURATION))
    } else {
        interpolate(100.0, target, progress(elapsed - RISE_DURATION, SETTLE_DURATION))
    }
}

fn progress(elapsed: Duration, duration: Duration) -> f64 {
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
}

/// Identifies one animation run. Frames for an older run are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunHandle(u64);

/// What happened to a delivered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Value updated; more frames wanted.
    Continue,
    /// Value settled on the target; no more frames wanted.
    Finished,
    /// Frame belonged to a replaced or cancelled run and was dropped.
    Stale,
}

/// Animation state of one gauge.
#[derive(Debug, Clone)]
pub struct GaugeAnimation {
    /// Last target as given by the caller (unclamped).
    requested: Option<f64>,
    /// Clamped target of the current run.
    target: f64,
    /// Currently displayed value.
    value: f64,
    /// Id of the latest run.
    run: u64,
    /// Timestamp of the first frame of the current run.
    started_at: Option<Instant>,
    running: bool,
}

impl Default for GaugeAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl GaugeAnimation {
    /// An idle gauge showing 0.
    pub fn new() -> Self {
        Self {
            requested: None,
            target: 0.0,
            value: 0.0,
            run: 0,
            started_at: None,
            running: false,
        }
    }

    /// Start a new run towards `target`, invalidating any previous run.
    ///
    /// The displayed value jumps back to 0 even when a run was in flight.
    pub fn start(&mut self, target: f64) -> RunHandle {
        self.run += 1;
        self.requested = Some(target);
        self.target = clamp_percent(target);
        self.value = 0.0;
        self.started_at = None;
        self.running = true;

        tracing::debug!(run = self.run, target = self.target, "Gauge animation started");

        RunHandle(self.run)
    }

    /// Start a run only if `target` differs from the last requested one.
    pub fn set_target(&mut self, target: f64) -> Option<RunHandle> {
        let unchanged = self
            .requested
            .is_some_and(|previous| previous.to_bits() == target.to_bits());

        if unchanged {
            None
        } else {
            Some(self.start(target))
        }
    }

    /// Stop the current run. Later frames are dropped. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        if self.running {
            tracing::debug!(run = self.run, value = self.value, "Gauge animation cancelled");
        }
        self.running = false;
        self.started_at = None;
    }

    /// Cancel and forget the last target, as when the gauge is torn down.
    /// The next `set_target` always starts a run.
    pub fn reset(&mut self) {
        self.cancel();
        self.requested = None;
        self.value = 0.0;
    }

    /// Advance the run identified by `handle` to the frame time `now`.
    ///
    /// Elapsed time counts from the first frame of the run, so the first
    /// frame always shows 0.
    pub fn on_frame(&mut self, handle: RunHandle, now: Instant) -> FrameOutcome {
        if !self.running || handle.0 != self.run {
            return FrameOutcome::Stale;
        }

        let started_at = *self.started_at.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started_at);

        if elapsed >= TOTAL_DURATION {
            self.value = self.target;
            self.running = false;
            tracing::debug!(run = self.run, value = self.value, "Gauge animation settled");
            return FrameOutcome::Finished;
        }

        self.value = value_at(self.target, elapsed);
        FrameOutcome::Continue
    }

    /// Handle of the run in progress.
    pub fn current_run(&self) -> Option<RunHandle> {
        self.running.then_some(RunHandle(self.run))
    }

    /// Whether frames are wanted.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Currently displayed value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Clamped target of the latest run.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Pointer rotation for the displayed value.
    pub fn rotation(&self) -> f64 {
        rotation(self.value)
    }

    /// Rounded value shown in the label.
    pub fn label(&self) -> i64 {
        self.value.round() as i64
    }
}
