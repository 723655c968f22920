use std::time::{Duration, Instant};

/// Per-frame measurements handed to a [`FrameObserver`].
#[derive(Debug, Copy, Clone)]
pub struct FrameStats {
    pub frame_index: u64,
    /// Time since the previous frame was presented.
    pub dt: Duration,
    /// Time spent in this frame, from message dispatch to present.
    pub frame_time: Duration,
    /// Timestamp taken after present.
    pub now: Instant,
    pub messages_handled: usize,
    pub buffers_drawn: usize,
    pub cached_tiles: usize,
}

/// Observability hook invoked once per presented frame on the render thread.
///
/// Rendering does not depend on whether an observer is installed.
pub trait FrameObserver: Send {
    fn on_frame(&mut self, stats: &FrameStats);
}

impl<F> FrameObserver for F
where
    F: FnMut(&FrameStats) + Send,
{
    fn on_frame(&mut self, stats: &FrameStats) {
        self(stats)
    }
}

/// One aggregation window of [`FpsReporter`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FpsSample {
    pub fps: f64,
    /// Mean time per frame.
    pub tpf: Duration,
}

/// Logs average frames per second and time per frame once per window.
#[derive(Debug, Clone)]
pub struct FpsReporter {
    window: Duration,
    elapsed: Duration,
    busy: Duration,
    frames: u32,
    last: Option<FpsSample>,
}

impl FpsReporter {
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1))
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            elapsed: Duration::ZERO,
            busy: Duration::ZERO,
            frames: 0,
            last: None,
        }
    }

    /// Most recently completed window, if any.
    #[inline]
    pub fn last_sample(&self) -> Option<FpsSample> {
        self.last
    }
}

impl Default for FpsReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameObserver for FpsReporter {
    fn on_frame(&mut self, stats: &FrameStats) {
        self.frames += 1;
        self.elapsed += stats.dt;
        self.busy += stats.frame_time;

        if self.elapsed < self.window {
            return;
        }

        let sample = FpsSample {
            fps: self.frames as f64 / self.elapsed.as_secs_f64(),
            tpf: self.busy / self.frames,
        };
        log::info!(
            "average fps: {:.1}, average tpf: {:.3} ms",
            sample.fps,
            sample.tpf.as_secs_f64() * 1000.0
        );

        self.last = Some(sample);
        self.elapsed = Duration::ZERO;
        self.busy = Duration::ZERO;
        self.frames = 0;
    }
}
