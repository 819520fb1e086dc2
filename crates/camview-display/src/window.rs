use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use camview_frame::{Frame, FrameGeometry};
use pixels::{Pixels, SurfaceTexture};
use tracing::{debug, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::Key;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::error::{DisplayError, Result};
use crate::surface::{gray_to_rgba, DisplaySurface, SurfaceSignal, DEFAULT_TITLE};

/// Pump attempts while waiting for the platform to hand over the window.
const STARTUP_PUMPS: usize = 50;
const STARTUP_WAIT: Duration = Duration::from_millis(10);

/// Window parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// A desktop window showing one grayscale frame at a time.
///
/// The event loop is pumped synchronously from [`DisplaySurface::poll_signal`],
/// so the window only stays responsive while the caller polls it.
pub struct WindowSurface {
    event_loop: EventLoop<()>,
    app: SurfaceApp,
    geometry: FrameGeometry,
    closed: bool,
}

impl WindowSurface {
    /// Create the window and its pixel buffer for frames of `geometry`.
    pub fn open(config: &WindowConfig, geometry: FrameGeometry) -> Result<Self> {
        surface_size(geometry)?;
        let mut event_loop = EventLoop::new()?;
        let mut app = SurfaceApp::new(config.title.clone(), geometry);

        for _ in 0..STARTUP_PUMPS {
            let status = event_loop.pump_app_events(Some(STARTUP_WAIT), &mut app);
            if let Some(err) = app.error.take() {
                return Err(err);
            }
            if app.pixels.is_some() {
                break;
            }
            if let PumpStatus::Exit(code) = status {
                debug!(code, "event loop exited during startup");
                return Err(DisplayError::NotCreated);
            }
        }

        if app.pixels.is_none() {
            return Err(DisplayError::NotCreated);
        }

        info!(title = %config.title, %geometry, "opened display window");

        Ok(Self {
            event_loop,
            app,
            geometry,
            closed: false,
        })
    }

    /// Frame dimensions this window accepts.
    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }
}

impl DisplaySurface for WindowSurface {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        if self.closed {
            return Err(DisplayError::Closed);
        }
        if frame.geometry() != self.geometry {
            return Err(DisplayError::GeometryMismatch {
                expected: self.geometry,
                actual: frame.geometry(),
            });
        }

        let pixels = self.app.pixels.as_mut().ok_or(DisplayError::Closed)?;
        gray_to_rgba(frame.as_bytes(), pixels.frame_mut());
        pixels.render()?;
        Ok(())
    }

    fn poll_signal(&mut self, wait: Duration) -> Result<Option<SurfaceSignal>> {
        if self.closed {
            return Err(DisplayError::Closed);
        }

        let status = self.event_loop.pump_app_events(Some(wait), &mut self.app);
        if let Some(err) = self.app.error.take() {
            return Err(err);
        }
        if let PumpStatus::Exit(_) = status {
            self.app.signals.push_back(SurfaceSignal::CloseRequested);
        }

        Ok(self.app.signals.pop_front())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        // The pixel surface borrows the window; release it first.
        self.app.pixels = None;
        self.app.window = None;
        let _ = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app);

        debug!("closed display window");
        Ok(())
    }
}

impl std::fmt::Debug for WindowSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowSurface")
            .field("title", &self.app.title)
            .field("geometry", &self.geometry)
            .field("closed", &self.closed)
            .finish()
    }
}

/// Event handler state shared with the pumped event loop.
struct SurfaceApp {
    title: String,
    geometry: FrameGeometry,
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    signals: VecDeque<SurfaceSignal>,
    error: Option<DisplayError>,
}

impl SurfaceApp {
    fn new(title: String, geometry: FrameGeometry) -> Self {
        Self {
            title,
            geometry,
            window: None,
            pixels: None,
            signals: VecDeque::new(),
            error: None,
        }
    }

    fn create(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = surface_size(self.geometry)?;

        let attrs = Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(LogicalSize::new(width, height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let size = window.inner_size();
        let texture = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        let pixels = Pixels::new(width, height, texture)?;

        self.pixels = Some(pixels);
        self.window = Some(window);
        Ok(())
    }
}

impl ApplicationHandler for SurfaceApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.create(event_loop) {
            warn!(error = %err, "window creation failed");
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.signals.push_back(SurfaceSignal::CloseRequested);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(key) = pressed_char(&event) {
                    self.signals.push_back(SurfaceSignal::Key(key));
                }
            }
            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(pixels) = self.pixels.as_mut() {
                    if let Err(err) = pixels.resize_surface(size.width, size.height) {
                        self.error = Some(err.into());
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(pixels) = self.pixels.as_ref() {
                    if let Err(err) = pixels.render() {
                        self.error = Some(err.into());
                    }
                }
            }
            _ => {}
        }
    }
}

/// Pixel buffer dimensions for `geometry`, if they fit the platform's `u32`.
fn surface_size(geometry: FrameGeometry) -> Result<(u32, u32)> {
    let width = u32::try_from(geometry.width());
    let height = u32::try_from(geometry.height());
    match (width, height) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(DisplayError::SurfaceTooLarge(geometry)),
    }
}

/// The character a fresh key press produced, if it produced exactly one.
fn pressed_char(event: &KeyEvent) -> Option<char> {
    if event.state != ElementState::Pressed || event.repeat {
        return None;
    }
    key_char(&event.logical_key)
}

fn key_char(key: &Key) -> Option<char> {
    match key {
        Key::Character(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        }
        _ => None,
    }
}
