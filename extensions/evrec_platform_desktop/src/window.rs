//! Desktop window implementation using winit

use evrec_platform::{MonitorId, Window, WindowConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window as WinitWindow, WindowAttributes};

/// Desktop window wrapping a winit window.
///
/// Clones share the same native window and close flag.
#[derive(Clone)]
pub struct DesktopWindow {
    window: Arc<WinitWindow>,
    should_close: Arc<AtomicBool>,
}

impl DesktopWindow {
    /// Create a new desktop window
    pub fn new(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, winit::error::OsError> {
        let attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(config.resizable);

        let window = Arc::new(event_loop.create_window(attrs)?);

        Ok(Self {
            window,
            should_close: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Whether the native window is currently maximized
    pub fn is_maximized(&self) -> bool {
        self.window.is_maximized()
    }
}

impl Window for DesktopWindow {
    fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn set_position(&self, x: i32, y: i32) {
        self.window.set_outer_position(PhysicalPosition::new(x, y));
    }

    fn set_size(&self, width: u32, height: u32) {
        // The platform may apply the size later and report it through a resize event
        let _ = self
            .window
            .request_inner_size(PhysicalSize::new(width, height));
    }

    fn maximize(&self) {
        self.window.set_maximized(true);
    }

    fn restore(&self) {
        self.window.set_maximized(false);
    }

    fn set_cursor_position(&self, x: i32, y: i32) {
        if let Err(e) = self
            .window
            .set_cursor_position(PhysicalPosition::new(x, y))
        {
            tracing::warn!("Failed to move cursor to {},{}: {}", x, y, e);
        }
    }

    fn set_should_close(&self, close: bool) {
        self.should_close.store(close, Ordering::Relaxed);
    }

    fn should_close(&self) -> bool {
        self.should_close.load(Ordering::Relaxed)
    }

    fn monitor_name(&self, monitor: MonitorId) -> Option<String> {
        self.window
            .available_monitors()
            .nth(monitor.0 as usize)
            .and_then(|handle| handle.name())
    }

    fn joystick_name(&self, _joystick: i32) -> Option<String> {
        // winit has no gamepad support
        None
    }
}
