use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use camview_display::{DisplaySurface, SurfaceSignal};
use camview_frame::{Frame, FrameReader, ReadOutcome};
use camview_transport::Transport;
use tracing::{debug, info, trace, warn};

use crate::config::ViewerConfig;
use crate::error::Result;

/// Where the preview loop is.
///
/// ```text
///            ┌─────── incomplete ───────┐
///            ▼                          │
///   ┌──► AwaitingFrame ─── frame ──► Rendering ──► CheckingCancel ──┐
///   │                                                  │            │
///   └──────────────────── no signal ───────────────────┘      key / close / limit
///                                                                   ▼
///                                                               Finished
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerState {
    /// Blocking on the transport for the next frame.
    AwaitingFrame,
    /// A complete frame is ready for the surface.
    Rendering(Frame),
    /// Polling the surface for the cancellation key.
    CheckingCancel,
    /// The loop is over.
    Finished(StopReason),
}

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The cancellation key was pressed.
    CancelKey,
    /// The window was closed.
    WindowClosed,
    /// The configured number of frames was rendered.
    FrameLimit,
    /// The shared running flag was cleared (Ctrl-C).
    Interrupted,
}

impl StopReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::CancelKey => "cancel-key",
            StopReason::WindowClosed => "window-closed",
            StopReason::FrameLimit => "frame-limit",
            StopReason::Interrupted => "interrupted",
        }
    }
}

/// Counters for one finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerSummary {
    pub frames_rendered: u64,
    pub incomplete_frames: u64,
    pub stop_reason: StopReason,
}

/// Reads frames from a transport and presents them until cancelled.
///
/// The viewer owns both the transport and the surface and closes each of
/// them exactly once, either at the end of [`FrameViewer::run`] or on drop.
pub struct FrameViewer<T: Transport, D: DisplaySurface> {
    reader: FrameReader<T>,
    display: D,
    config: ViewerConfig,
    state: ViewerState,
    running: Option<Arc<AtomicBool>>,
    frames_rendered: u64,
    incomplete_frames: u64,
    shut_down: bool,
}

impl<T: Transport, D: DisplaySurface> FrameViewer<T, D> {
    /// Take ownership of an open transport and surface.
    pub fn new(config: ViewerConfig, transport: T, display: D) -> Result<Self> {
        config.validate()?;
        let reader = FrameReader::with_config(transport, config.frame_config());
        Ok(Self {
            reader,
            display,
            config,
            state: ViewerState::AwaitingFrame,
            running: None,
            frames_rendered: 0,
            incomplete_frames: 0,
            shut_down: false,
        })
    }

    /// Stop at the next frame boundary once `running` is cleared.
    pub fn with_running_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = Some(running);
        self
    }

    /// Run until the loop finishes, then shut down.
    ///
    /// Cleanup runs on the error path too; the first error wins.
    pub fn run(&mut self) -> Result<ViewerSummary> {
        info!(
            transport = self.reader.get_ref().describe(),
            geometry = %self.config.geometry,
            "waiting for image data"
        );

        let stop_reason = loop {
            let step = self.step().map(|state| match state {
                ViewerState::Finished(reason) => Some(*reason),
                _ => None,
            });
            match step {
                Ok(Some(reason)) => break reason,
                Ok(None) => {}
                Err(err) => {
                    if let Err(cleanup) = self.shutdown() {
                        warn!(error = %cleanup, "cleanup after failure also failed");
                    }
                    return Err(err);
                }
            }
        };

        self.shutdown()?;

        let summary = self.summary(stop_reason);
        info!(
            frames = summary.frames_rendered,
            incomplete = summary.incomplete_frames,
            reason = stop_reason.as_str(),
            "viewer stopped"
        );
        Ok(summary)
    }

    /// Advance the state machine by one transition.
    pub fn step(&mut self) -> Result<&ViewerState> {
        let current = std::mem::replace(&mut self.state, ViewerState::AwaitingFrame);
        self.state = match current {
            ViewerState::AwaitingFrame => self.await_frame()?,
            ViewerState::Rendering(frame) => self.render(frame)?,
            ViewerState::CheckingCancel => self.check_cancel()?,
            finished @ ViewerState::Finished(_) => finished,
        };
        Ok(&self.state)
    }

    fn await_frame(&mut self) -> Result<ViewerState> {
        if !self.is_running() {
            return Ok(ViewerState::Finished(StopReason::Interrupted));
        }

        match self.reader.read_frame()? {
            ReadOutcome::Complete(frame) => {
                trace!("frame received");
                Ok(ViewerState::Rendering(frame))
            }
            ReadOutcome::Incomplete(incomplete) => {
                self.incomplete_frames += 1;
                warn!(
                    received = incomplete.received,
                    expected = incomplete.expected,
                    shortfall = incomplete.shortfall().as_str(),
                    "incomplete frame received"
                );
                Ok(ViewerState::AwaitingFrame)
            }
        }
    }

    fn render(&mut self, frame: Frame) -> Result<ViewerState> {
        let frame = if self.config.scale > 1 {
            frame.magnify(self.config.scale)?
        } else {
            frame
        };
        self.display.render(&frame)?;
        self.frames_rendered += 1;
        Ok(ViewerState::CheckingCancel)
    }

    fn check_cancel(&mut self) -> Result<ViewerState> {
        match self.display.poll_signal(self.config.poll_interval)? {
            Some(SurfaceSignal::Key(key)) if key == self.config.cancel_key => {
                debug!(%key, "cancellation key pressed");
                return Ok(ViewerState::Finished(StopReason::CancelKey));
            }
            Some(SurfaceSignal::Key(key)) => trace!(%key, "ignoring key"),
            Some(SurfaceSignal::CloseRequested) => {
                debug!("window close requested");
                return Ok(ViewerState::Finished(StopReason::WindowClosed));
            }
            None => {}
        }

        if let Some(limit) = self.config.frame_limit {
            if self.frames_rendered >= limit {
                return Ok(ViewerState::Finished(StopReason::FrameLimit));
            }
        }

        Ok(ViewerState::AwaitingFrame)
    }

    /// Close the transport and the surface. Idempotent.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.shut_down {
            return Ok(());
        }
        self.shut_down = true;

        let transport = self.reader.get_mut().close();
        let display = self.display.close();
        debug!("viewer resources released");

        transport?;
        display?;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(true)
    }

    fn summary(&self, stop_reason: StopReason) -> ViewerSummary {
        ViewerSummary {
            frames_rendered: self.frames_rendered,
            incomplete_frames: self.incomplete_frames,
            stop_reason,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn incomplete_frames(&self) -> u64 {
        self.incomplete_frames
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &T {
        self.reader.get_ref()
    }

    /// Borrow the display surface.
    pub fn display(&self) -> &D {
        &self.display
    }
}

impl<T: Transport, D: DisplaySurface> Drop for FrameViewer<T, D> {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            warn!(error = %err, "viewer shutdown on drop failed");
        }
    }
}

/// Open the configured serial port and a window sized for it.
///
/// The port is opened first; if the window then fails, the port is
/// released before the error is returned.
#[cfg(feature = "window")]
pub fn open_serial_window(
    config: ViewerConfig,
) -> Result<FrameViewer<camview_transport::SerialTransport, camview_display::WindowSurface>> {
    config.validate()?;
    let transport = camview_transport::SerialTransport::open(&config.serial)?;
    let window_config = camview_display::WindowConfig {
        title: config.title.clone(),
    };
    let window = camview_display::WindowSurface::open(&window_config, config.display_geometry()?)?;
    FrameViewer::new(config, transport, window)
}
