//! Desktop event source using winit's pump API
//!
//! winit normally owns the thread through `run_app`. Recording and replay
//! need the application's own frame loop instead, so events are pumped with
//! a zero timeout once per frame and queued for `poll_event`.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

use crate::input;
use crate::window::DesktopWindow;
use evrec_platform::{Event, EventSource, PlatformError, Result, Window, WindowConfig};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, Ime, WindowEvent as WinitWindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop as WinitEventLoop};
use winit::keyboard::ModifiersState;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::WindowId;

/// How long `new` waits for the platform to hand out the first window
const WINDOW_CREATION_TIMEOUT: Duration = Duration::from_secs(5);
const WINDOW_CREATION_POLL: Duration = Duration::from_millis(10);

/// Desktop event source wrapping winit's event loop
pub struct DesktopEventSource {
    event_loop: WinitEventLoop<()>,
    collector: Collector,
    window: DesktopWindow,
}

impl DesktopEventSource {
    /// Create the event loop and its window, pumping until the window exists.
    pub fn new(config: WindowConfig) -> Result<Self> {
        // NOTE(macos): Explicitly set activation policy to Regular so the window behaves like a
        // normal app window. Without this, non-bundled binaries can behave like UI-less helpers.
        let mut event_loop = {
            let mut builder = WinitEventLoop::builder();

            #[cfg(target_os = "macos")]
            {
                use winit::platform::macos::{ActivationPolicy, EventLoopBuilderExtMacOS};
                builder.with_activation_policy(ActivationPolicy::Regular);
            }

            builder
                .build()
                .map_err(|e| PlatformError::EventLoop(e.to_string()))?
        };

        let mut collector = Collector::new(config);
        let attempts = WINDOW_CREATION_TIMEOUT.as_millis() / WINDOW_CREATION_POLL.as_millis();
        for _ in 0..attempts {
            let status = event_loop.pump_app_events(Some(WINDOW_CREATION_POLL), &mut collector);
            if collector.window.is_some() || collector.creation_error.is_some() {
                break;
            }
            if let PumpStatus::Exit(code) = status {
                return Err(PlatformError::EventLoop(format!(
                    "event loop exited with code {code} before a window was created"
                )));
            }
        }

        let Some(window) = collector.window.clone() else {
            let reason = collector
                .creation_error
                .take()
                .unwrap_or_else(|| "timed out waiting for the window".to_string());
            return Err(PlatformError::WindowCreation(reason));
        };

        tracing::debug!(
            "Created window \"{}\" ({}x{})",
            collector.config.title,
            collector.config.width,
            collector.config.height
        );

        Ok(Self {
            event_loop,
            collector,
            window,
        })
    }
}

impl EventSource for DesktopEventSource {
    type Window = DesktopWindow;

    fn window(&self) -> &DesktopWindow {
        &self.window
    }

    fn pump_events(&mut self) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.collector);
        if let PumpStatus::Exit(code) = status {
            tracing::debug!("Event loop exited with code {}", code);
            self.window.set_should_close(true);
        }
    }

    fn poll_event(&mut self) -> Option<Event> {
        self.collector.queue.pop_front()
    }
}

/// Internal winit application handler that queues converted events
struct Collector {
    config: WindowConfig,
    window: Option<DesktopWindow>,
    creation_error: Option<String>,
    queue: VecDeque<Event>,
    modifiers: ModifiersState,
    maximized: bool,
    /// Set while consecutive `DroppedFile` events arrive
    dropping_files: bool,
}

impl Collector {
    fn new(config: WindowConfig) -> Self {
        Self {
            config,
            window: None,
            creation_error: None,
            queue: VecDeque::new(),
            modifiers: ModifiersState::empty(),
            maximized: false,
            dropping_files: false,
        }
    }

    fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// winit reports one event per dropped file; merge a burst into one event.
    /// Any other window event, or the end of a pump, ends the burst.
    fn push_dropped_file(&mut self, path: PathBuf) {
        if self.dropping_files {
            if let Some(Event::FileDropped { paths }) = self.queue.back_mut() {
                paths.push(path);
                return;
            }
        }
        self.dropping_files = true;
        self.push(Event::FileDropped { paths: vec![path] });
    }

    /// winit has no maximize event, so compare the state after each resize
    fn sync_maximized(&mut self) {
        let Some(maximized) = self.window.as_ref().map(DesktopWindow::is_maximized) else {
            return;
        };
        if maximized != self.maximized {
            self.maximized = maximized;
            self.push(if maximized {
                Event::WindowMaximized
            } else {
                Event::WindowUnmaximized
            });
        }
    }
}

impl ApplicationHandler for Collector {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Create window if we don't have one
        if self.window.is_none() {
            match DesktopWindow::new(event_loop, &self.config) {
                Ok(window) => {
                    self.maximized = window.is_maximized();
                    self.window = Some(window);
                }
                Err(e) => {
                    tracing::error!("Failed to create window: {}", e);
                    self.creation_error = Some(e.to_string());
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WinitWindowEvent,
    ) {
        self.handle_window_event(event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.end_pump();
    }
}

impl Collector {
    fn end_pump(&mut self) {
        self.dropping_files = false;
    }

    fn handle_window_event(&mut self, event: WinitWindowEvent) {
        if !matches!(event, WinitWindowEvent::DroppedFile(_)) {
            self.dropping_files = false;
        }

        match event {
            WinitWindowEvent::CloseRequested => {
                if let Some(ref window) = self.window {
                    window.set_should_close(true);
                }
                self.push(Event::WindowClosed);
            }

            WinitWindowEvent::Resized(size) => {
                self.push(Event::WindowResized {
                    width: size.width,
                    height: size.height,
                });
                self.push(Event::FramebufferResized {
                    width: size.width,
                    height: size.height,
                });
                self.sync_maximized();
            }

            WinitWindowEvent::Moved(pos) => {
                self.push(Event::WindowMoved { x: pos.x, y: pos.y });
            }

            WinitWindowEvent::Focused(true) => self.push(Event::WindowFocused),
            WinitWindowEvent::Focused(false) => self.push(Event::WindowDefocused),

            WinitWindowEvent::Occluded(true) => self.push(Event::WindowIconified),
            WinitWindowEvent::Occluded(false) => self.push(Event::WindowUniconified),

            WinitWindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let scale = scale_factor as f32;
                self.push(Event::WindowScaleChanged { x: scale, y: scale });
            }

            WinitWindowEvent::RedrawRequested => self.push(Event::WindowRefresh),

            WinitWindowEvent::ModifiersChanged(mods) => {
                self.modifiers = mods.state();
            }

            WinitWindowEvent::KeyboardInput { event, .. } => {
                self.push(input::convert_keyboard_event(&event, self.modifiers));
                if event.state == ElementState::Pressed {
                    if let Some(text) = event.text.as_deref() {
                        self.queue.extend(input::text_input(text));
                    }
                }
            }

            WinitWindowEvent::Ime(Ime::Commit(text)) => {
                self.queue.extend(input::text_input(&text));
            }

            WinitWindowEvent::CursorMoved { position, .. } => {
                self.push(Event::CursorMoved {
                    x: position.x as i32,
                    y: position.y as i32,
                });
            }

            WinitWindowEvent::MouseInput { state, button, .. } => {
                self.push(input::convert_mouse_input(state, button, self.modifiers));
            }

            WinitWindowEvent::MouseWheel { delta, .. } => {
                let (x, y) = input::scroll_delta(delta);
                self.push(Event::Scrolled { x, y });
            }

            WinitWindowEvent::CursorEntered { .. } => self.push(Event::CursorEntered),
            WinitWindowEvent::CursorLeft { .. } => self.push(Event::CursorLeft),

            WinitWindowEvent::DroppedFile(path) => self.push_dropped_file(path),

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dropped(collector: &mut Collector, path: &str) {
        collector.handle_window_event(WinitWindowEvent::DroppedFile(PathBuf::from(path)));
    }

    fn files(paths: &[&str]) -> Event {
        Event::FileDropped {
            paths: paths.iter().map(PathBuf::from).collect(),
        }
    }

    #[test]
    fn consecutive_drops_merge_until_another_event() {
        let mut collector = Collector::new(WindowConfig::default());

        dropped(&mut collector, "/a");
        dropped(&mut collector, "/b");
        collector.handle_window_event(WinitWindowEvent::HoveredFile(PathBuf::from("/c")));
        dropped(&mut collector, "/c");
        collector.handle_window_event(WinitWindowEvent::Focused(true));
        dropped(&mut collector, "/d");

        let events: Vec<_> = collector.queue.drain(..).collect();
        assert_eq!(
            events,
            vec![
                files(&["/a", "/b"]),
                files(&["/c"]),
                Event::WindowFocused,
                files(&["/d"]),
            ]
        );
    }

    #[test]
    fn drops_in_separate_pumps_stay_separate() {
        let mut collector = Collector::new(WindowConfig::default());

        dropped(&mut collector, "/first");
        collector.end_pump();
        dropped(&mut collector, "/second");

        let events: Vec<_> = collector.queue.drain(..).collect();
        assert_eq!(events, vec![files(&["/first"]), files(&["/second"])]);
    }
}
