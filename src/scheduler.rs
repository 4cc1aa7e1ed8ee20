//! Frame scheduling and timing utilities.
//!
//! [`FrameScheduler::tick`] is portable: it runs one frame and returns the
//! deadline for the next one, leaving the sleep to the caller.
//! [`FrameScheduler::run`] wraps it in an `embassy-time` loop that also
//! drains a [`ControlSignal`] at every suspension point.

use embassy_time::{Duration, Instant, Timer};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::HardwareSink;
use crate::animation::{Animation, AnimationSlot};
use crate::config::EffectConfig;
use crate::error::{Error, Result};
use crate::pixel_buffer::PixelBuffer;
use crate::signal::{ControlRequest, ControlSignal};

/// How often an idle scheduler checks for new requests
pub const IDLE_POLL: Duration = Duration::from_millis(100);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameResult {
    /// Number of the frame just rendered, starting at 1
    pub frame: u32,
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Why a run ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    FrameLimitReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was computed and flushed
    Frame(FrameResult),
    /// Nothing is running
    Idle,
    /// The run just ended
    Stopped(StopReason),
}

#[derive(Debug)]
struct Run {
    animation: AnimationSlot,
    frame: u32,
    frame_limit: Option<u32>,
    interval: Duration,
}

/// Drives one animation at a time against a pixel buffer and sink.
///
/// The scheduler:
/// - Runs `setup()` once per run, then one `compute_frame()` per tick
/// - Flushes the buffer to the sink after every frame
/// - Tracks frame timing with drift correction
/// - Stops on cancellation, frame limit, or the first error
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(buffer, sink);
/// scheduler.apply(&EffectConfig::parse_query("effect=fire")?, Instant::now())?;
///
/// loop {
///     match scheduler.tick(Instant::now())? {
///         TickOutcome::Frame(result) => sleep(result.sleep_duration),
///         _ => break,
///     }
/// }
/// ```
pub struct FrameScheduler<S: HardwareSink> {
    sink: S,
    buffer: PixelBuffer,
    run: Option<Run>,
    next_frame: Instant,
}

impl<S: HardwareSink> FrameScheduler<S> {
    pub fn new(buffer: PixelBuffer, sink: S) -> Self {
        Self {
            sink,
            buffer,
            run: None,
            next_frame: Instant::from_millis(0),
        }
    }

    pub const fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub const fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub const fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Frames rendered in the current run
    pub fn frame(&self) -> Option<u32> {
        self.run.as_ref().map(|run| run.frame)
    }

    pub fn animation(&self) -> Option<&AnimationSlot> {
        self.run.as_ref().map(|run| &run.animation)
    }

    /// Start `animation`, dropping whatever was running.
    ///
    /// On a setup failure nothing is left running.
    pub fn start(
        &mut self,
        mut animation: AnimationSlot,
        frame_limit: Option<u32>,
        now: Instant,
    ) -> Result<()> {
        self.stop();
        self.buffer.clear();
        animation.setup(&mut self.buffer)?;
        #[cfg(feature = "esp32-log")]
        println!("[scheduler] start {}", animation.id().as_str());
        self.run = Some(Run {
            interval: animation.interval(),
            animation,
            frame: 0,
            frame_limit,
        });
        self.next_frame = now;
        Ok(())
    }

    /// Build `config`, then replace the current run with it.
    ///
    /// A config that fails to build leaves the current run untouched.
    pub fn apply(&mut self, config: &EffectConfig, now: Instant) -> Result<()> {
        let animation = config.build(&self.buffer)?;
        self.start(animation, config.frame_limit, now)
    }

    /// Drop the current run. Returns whether anything was running.
    pub fn stop(&mut self) -> bool {
        let stopped = self.run.take().is_some();
        #[cfg(feature = "esp32-log")]
        if stopped {
            println!("[scheduler] stopped");
        }
        stopped
    }

    /// Act on a control request
    pub fn handle(&mut self, request: ControlRequest, now: Instant) -> Result<Option<StopReason>> {
        match request {
            ControlRequest::Apply(config) => {
                self.apply(&config, now)?;
                Ok(None)
            }
            ControlRequest::Cancel => {
                self.stop();
                Ok(Some(StopReason::Cancelled))
            }
        }
    }

    /// Compute, flush and schedule one frame.
    ///
    /// Any error ends the run before it is returned; nothing is retried.
    pub fn tick(&mut self, now: Instant) -> Result<TickOutcome> {
        let Some(run) = self.run.as_mut() else {
            return Ok(TickOutcome::Idle);
        };
        if run.frame_limit.is_some_and(|limit| run.frame >= limit) {
            self.run = None;
            return Ok(TickOutcome::Stopped(StopReason::FrameLimitReached));
        }

        // Drift correction: if we've fallen too far behind, reset to now
        // This prevents catch-up bursts after long stalls
        let max_drift = run.interval.as_millis() * 2;
        if now.as_millis() > self.next_frame.as_millis() + max_drift {
            self.next_frame = now;
        }

        run.frame += 1;
        let frame = run.frame;
        let rendered = run
            .animation
            .compute_frame(&mut self.buffer, frame)
            .and_then(|()| self.buffer.flush(&mut self.sink));
        if let Err(err) = rendered {
            #[cfg(feature = "esp32-log")]
            println!("[scheduler] frame {} failed: {}", frame, err);
            self.run = None;
            return Err(err);
        }

        self.next_frame += run.interval;
        let sleep_duration = if self.next_frame.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_frame.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        Ok(TickOutcome::Frame(FrameResult {
            frame,
            next_deadline: self.next_frame,
            sleep_duration,
        }))
    }

    /// Run frames until cancelled, the frame limit is hit, or the sink fails.
    ///
    /// Requests posted to `signal` are handled between frames. A request that
    /// fails to build or set up is dropped and the loop goes on. While idle
    /// the loop keeps polling so a later `apply` starts a new run.
    pub async fn run(&mut self, signal: &ControlSignal) -> Result<StopReason> {
        loop {
            if let Some(request) = signal.take() {
                match self.handle(request, Instant::now()) {
                    Ok(Some(reason)) => return Ok(reason),
                    Ok(None) => {}
                    Err(err) => fatal(err)?,
                }
            }
            let outcome = match self.tick(Instant::now()) {
                Ok(outcome) => outcome,
                Err(err) => {
                    fatal(err)?;
                    TickOutcome::Idle
                }
            };
            match outcome {
                TickOutcome::Frame(result) => Timer::at(result.next_deadline).await,
                TickOutcome::Idle => Timer::after(IDLE_POLL).await,
                TickOutcome::Stopped(reason) => return Ok(reason),
            }
        }
    }
}

/// Only hardware failures end the driver loop; anything else is logged
fn fatal(err: Error) -> Result<()> {
    match err {
        Error::Hardware(_) => Err(err),
        _ => {
            #[cfg(feature = "esp32-log")]
            println!("[scheduler] request rejected: {}", err);
            Ok(())
        }
    }
}
