// THEORY:
// The `runtime` module owns everything around the pipeline that is not image
// math: where frames come from, when the pipeline runs, and where the results
// go. The three collaborators are traits (`FrameSource`, `ParameterSource`,
// `DisplaySink`) so the engine never links against a concrete camera stack or
// display surface.
//
// Key architectural principles:
// 1.  **Producer/consumer over a latest-frame mailbox**: The capture task
//     publishes into a single-slot `FrameMailbox`; the render task takes from
//     it. The drop policy is explicit and deliberate: latest wins. If the
//     renderer falls behind, intermediate frames are replaced unconsumed and
//     counted, never queued. A live preview wants the freshest frame, not a
//     growing backlog of stale ones.
// 2.  **Scoped capture acquisition**: The frame source is moved into the
//     capture task. Whatever device handle it wraps is released when that
//     task ends, on every exit path, including an abort from `Drop`.
// 3.  **Failures never stop the cycle**: A cycle whose frame cannot be
//     encoded presents `None` to the sink and the loop keeps going. Stopping
//     is always an external decision, not a failure response.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future;
use log::{debug, info, warn};
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;

use crate::pipeline::{
    EncodedImage, Frame, FramePipeline, StageFault, TransformParameters,
};

/// Default delay between capture attempts (roughly 30 frames per second).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Supplies captured frames to a session.
///
/// `None` means "no frame available right now" and is an explicit signal; a
/// warming-up camera returns `None`, while a broken capture returns an empty
/// frame that fails later at the encoder.
pub trait FrameSource: Send {
    fn grab(&mut self) -> Option<Frame>;
}

/// Supplies the parameter snapshot read once at the start of each cycle.
pub trait ParameterSource: Send + Sync {
    fn snapshot(&self) -> TransformParameters;
}

/// Receives the encoded artifacts of each cycle.
///
/// Both present methods are called exactly once per cycle; `None` means the
/// cycle produced nothing (the frame failed to encode) and must be tolerated.
pub trait DisplaySink: Send {
    fn present_frame(&mut self, image: Option<&EncodedImage>);
    fn present_histogram(&mut self, image: Option<&EncodedImage>);

    /// Called before presentation when stages degraded this cycle. The
    /// default implementation ignores the report.
    fn report_faults(&mut self, _faults: &[StageFault]) {}
}

/// A `ParameterSource` backed by a shared, swappable snapshot.
///
/// Clone it freely: one clone goes to the session, the others stay with
/// whatever control surface adjusts the settings.
#[derive(Clone, Default)]
pub struct SharedParameters {
    current: Arc<Mutex<TransformParameters>>,
}

impl SharedParameters {
    pub fn new(initial: TransformParameters) -> Self {
        Self {
            current: Arc::new(Mutex::new(initial)),
        }
    }

    /// Replaces the snapshot future cycles will see.
    pub fn set(&self, params: TransformParameters) {
        *self.current.lock().unwrap() = params;
    }

    pub fn get(&self) -> TransformParameters {
        *self.current.lock().unwrap()
    }
}

impl ParameterSource for SharedParameters {
    fn snapshot(&self) -> TransformParameters {
        self.get()
    }
}

/// Single-slot hand-off between the capture task and the render task.
///
/// Holds at most one frame: the latest published. Publishing over an
/// unconsumed frame replaces it and counts a drop.
#[derive(Default)]
pub struct FrameMailbox {
    slot: Mutex<Option<Frame>>,
    available: Notify,
    dropped: AtomicU64,
}

impl FrameMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes the latest frame. Returns `true` when an unconsumed frame
    /// was replaced (and counted as dropped).
    pub fn publish(&self, frame: Frame) -> bool {
        let replaced = {
            let mut slot = self.slot.lock().unwrap();
            slot.replace(frame).is_some()
        };
        if replaced {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        self.available.notify_one();
        replaced
    }

    /// Takes the latest frame, waiting until one is published.
    pub async fn take(&self) -> Frame {
        loop {
            if let Some(frame) = self.try_take() {
                return frame;
            }
            self.available.notified().await;
        }
    }

    /// Takes the latest frame if one is waiting.
    pub fn try_take(&self) -> Option<Frame> {
        self.slot.lock().unwrap().take()
    }

    /// Number of frames replaced before anyone consumed them.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Timing configuration for a capture session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Delay between capture attempts.
    pub frame_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }
}

/// A running capture/render loop.
///
/// `start` spawns the two tasks; `stop` signals and joins them. Dropping a
/// session that was never stopped aborts the tasks best-effort.
pub struct CaptureSession {
    shutdown: watch::Sender<bool>,
    mailbox: Arc<FrameMailbox>,
    capture_task: Option<JoinHandle<()>>,
    render_task: Option<JoinHandle<()>>,
}

impl CaptureSession {
    /// Spawns the capture and render tasks and returns a handle to them.
    ///
    /// The session takes ownership of the source and the sink. The source
    /// lives inside the capture task, so stopping the session releases the
    /// capture device no matter how the task exits.
    pub fn start<S, P, D>(
        mut source: S,
        pipeline: FramePipeline,
        params: P,
        mut sink: D,
        config: SessionConfig,
    ) -> Self
    where
        S: FrameSource + 'static,
        P: ParameterSource + 'static,
        D: DisplaySink + 'static,
    {
        let (shutdown, mut capture_shutdown) = watch::channel(false);
        let mut render_shutdown = shutdown.subscribe();
        let mailbox = Arc::new(FrameMailbox::new());
        let frame_interval = config.frame_interval;

        let capture_mailbox = mailbox.clone();
        let capture_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(frame_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = capture_shutdown.changed() => break,
                    _ = ticker.tick() => {
                        if let Some(frame) = source.grab() {
                            if capture_mailbox.publish(frame) {
                                debug!(
                                    "replaced an unconsumed frame (dropped {} so far)",
                                    capture_mailbox.dropped_frames()
                                );
                            }
                        }
                    }
                }
            }
            debug!("capture task stopped, source released");
        });

        let render_mailbox = mailbox.clone();
        let render_task = tokio::spawn(async move {
            loop {
                let frame = tokio::select! {
                    _ = render_shutdown.changed() => break,
                    frame = render_mailbox.take() => frame,
                };
                let snapshot = params.snapshot();
                match pipeline.process(frame, snapshot) {
                    Ok(artifacts) => {
                        if !artifacts.faults.is_empty() {
                            sink.report_faults(&artifacts.faults);
                        }
                        sink.present_frame(Some(&artifacts.frame));
                        sink.present_histogram(Some(&artifacts.histogram));
                    }
                    Err(error) => {
                        warn!("frame not delivered this cycle: {error}");
                        sink.present_frame(None);
                        sink.present_histogram(None);
                    }
                }
            }
            debug!("render task stopped");
        });

        info!("capture session started, one frame every {frame_interval:?}");

        Self {
            shutdown,
            mailbox,
            capture_task: Some(capture_task),
            render_task: Some(render_task),
        }
    }

    /// The hand-off mailbox, exposed for drop accounting.
    pub fn mailbox(&self) -> &FrameMailbox {
        &self.mailbox
    }

    /// Signals both tasks and waits for them to finish. Calling it again
    /// after they are gone is a no-op.
    pub async fn stop(&mut self) {
        let _ = self.shutdown.send(true);
        let capture = self.capture_task.take();
        let render = self.render_task.take();
        if let (Some(capture), Some(render)) = (capture, render) {
            let (capture_result, render_result) = future::join(capture, render).await;
            if let Err(error) = capture_result {
                warn!("capture task ended abnormally: {error}");
            }
            if let Err(error) = render_result {
                warn!("render task ended abnormally: {error}");
            }
            info!("capture session stopped");
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        // Best-effort shutdown for sessions dropped without an explicit stop.
        let _ = self.shutdown.send(true);
        if let Some(task) = self.capture_task.take() {
            task.abort();
        }
        if let Some(task) = self.render_task.take() {
            task.abort();
        }
    }
}
