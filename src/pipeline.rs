use anyhow::Result;
use log::{debug, error, warn};

use crate::Frame;
use crate::hand::HandObservation;
use crate::systems::Systems;

/// Produces one frame per tick. Blocking within the tick.
pub trait FrameSource {
    fn grab(&mut self) -> Result<Frame>;

    /// Tear down and re-establish the capture device after repeated
    /// failures.
    fn reopen(&mut self) -> Result<()>;
}

/// Hand-skeleton estimation for one frame. Blocking within the tick.
pub trait PoseProvider {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<HandObservation>>;
}

/// Receives one composited RGB frame per tick.
pub trait FrameSink {
    fn send_frame(&mut self, frame: &Frame) -> Result<()>;

    fn should_close(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Full chain ran: capture, detect, coordinate, composite, send.
    Composited,
    /// Capture failed; nothing was mutated this tick.
    SkippedCapture { reopened: bool },
    /// Pose estimation failed; objects unchanged, no frame sent.
    SkippedPose,
    /// The sink asked to stop.
    Closed,
}

/// Counts consecutive capture failures and decides when the source should
/// be reopened. A threshold of zero disables reopening.
pub struct CaptureWatchdog {
    consecutive_failures: u32,
    failures_before_reopen: u32,
}

impl CaptureWatchdog {
    pub fn new(failures_before_reopen: u32) -> Self {
        CaptureWatchdog {
            consecutive_failures: 0,
            failures_before_reopen,
        }
    }

    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Returns true when the failure streak has reached the reopen
    /// threshold; the streak restarts so reopening can happen again later.
    pub fn record_failure(&mut self) -> bool {
        self.consecutive_failures += 1;
        if self.failures_before_reopen > 0 && self.consecutive_failures >= self.failures_before_reopen
        {
            self.consecutive_failures = 0;
            return true;
        }
        false
    }
}

/// One cooperative tick: grab, detect, coordinate, composite, send.
/// Everything runs to completion before the caller schedules the next tick,
/// so the object store never needs locking. All failure modes are local:
/// a failed capture or detection skips the tick and the next one starts
/// fresh.
pub fn run_tick<S, P, K>(
    source: &mut S,
    pose: &mut P,
    sink: &mut K,
    systems: &mut Systems,
    watchdog: &mut CaptureWatchdog,
) -> TickOutcome
where
    S: FrameSource,
    P: PoseProvider,
    K: FrameSink,
{
    if sink.should_close() {
        return TickOutcome::Closed;
    }

    let mut frame = match source.grab() {
        Ok(frame) => {
            watchdog.record_success();
            frame
        }
        Err(e) => {
            warn!("Capture failed: {}", e);
            let reopened = if watchdog.record_failure() {
                warn!("Repeated capture failures; reopening capture source");
                if let Err(e) = source.reopen() {
                    error!("Failed to reopen capture source: {}", e);
                }
                true
            } else {
                false
            };
            return TickOutcome::SkippedCapture { reopened };
        }
    };

    let hands = match pose.detect(&frame) {
        Ok(hands) => hands,
        Err(e) => {
            warn!("Pose detection failed: {}", e);
            return TickOutcome::SkippedPose;
        }
    };
    debug!("{} hand(s) detected", hands.len());

    systems
        .interaction
        .apply_tick(&systems.classifier, &hands, frame.width(), frame.height());
    systems
        .compositor
        .composite(&mut frame, systems.interaction.store());

    if let Err(e) = sink.send_frame(&frame) {
        warn!("Frame sink rejected frame: {}", e);
    }

    TickOutcome::Composited
}
