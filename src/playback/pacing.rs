//! Frame pacing against a single reference start time.

use std::time::Duration;

/// Frame rate used when the source does not report a usable one.
pub const FALLBACK_FPS: f64 = 25.0;

/// Drift below this is not worth sleeping for.
pub const PACING_EPSILON: Duration = Duration::from_millis(1);

/// What to do with the frame about to be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAction {
    /// On time: draw now.
    Draw,
    /// Early: sleep this long, then draw.
    Sleep(Duration),
    /// More than one frame period late: drop it without sleeping.
    Skip,
}

/// Decides per-frame actions from `ideal(N) = N * period`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacer {
    period: Duration,
}

impl Pacer {
    /// Pacer for `fps` frames per second played at `speed` times real time.
    ///
    /// Non-finite or non-positive rates fall back to [`FALLBACK_FPS`] and 1.0.
    pub fn new(fps: f64, speed: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 {
            fps
        } else {
            FALLBACK_FPS
        };
        let speed = if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            1.0
        };
        Self {
            period: Duration::from_secs_f64(1.0 / (fps * speed)),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Presentation time of frame `index` relative to the start.
    pub fn ideal_time(&self, index: u64) -> Duration {
        let nanos = self.period.as_nanos().saturating_mul(index as u128);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Compare the ideal time of frame `index` with the elapsed time.
    pub fn decide(&self, index: u64, elapsed: Duration) -> FrameAction {
        let ideal = self.ideal_time(index);
        if ideal >= elapsed {
            let drift = ideal - elapsed;
            if drift > PACING_EPSILON {
                FrameAction::Sleep(drift)
            } else {
                FrameAction::Draw
            }
        } else if elapsed - ideal > self.period {
            FrameAction::Skip
        } else {
            FrameAction::Draw
        }
    }
}
