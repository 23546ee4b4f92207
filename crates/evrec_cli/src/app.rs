//! Demo application driven by the render dispatcher

use evrec_platform::{Event, KeyCode};
use evrec_recorder::{save_png, TestPattern};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Target frame time, roughly 60 fps
const FRAME_BUDGET: Duration = Duration::from_micros(16_667);

/// Minimal app: counts frames and events, screenshots on F12.
pub struct DemoApp {
    frames: u64,
    events: u64,
    size: (u32, u32),
    screenshot_dir: PathBuf,
    screenshot_requested: bool,
    screenshots: Vec<PathBuf>,
    last_frame: Option<Instant>,
    frame_budget: Duration,
}

impl DemoApp {
    pub fn new(size: (u32, u32), screenshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            frames: 0,
            events: 0,
            size,
            screenshot_dir: screenshot_dir.into(),
            screenshot_requested: false,
            screenshots: Vec::new(),
            last_frame: None,
            frame_budget: FRAME_BUDGET,
        }
    }

    /// Disable frame throttling
    pub fn unthrottled(mut self) -> Self {
        self.frame_budget = Duration::ZERO;
        self
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn events(&self) -> u64 {
        self.events
    }

    /// Screenshots written so far
    pub fn screenshots(&self) -> &[PathBuf] {
        &self.screenshots
    }

    pub fn handle_event(&mut self, event: &Event) {
        self.events += 1;
        match event {
            Event::KeyPressed { key, .. } if *key == KeyCode::F12 => {
                self.screenshot_requested = true;
            }
            Event::FramebufferResized { width, height } => {
                self.size = (*width, *height);
            }
            _ => {}
        }
    }

    pub fn update_and_draw(&mut self) {
        self.frames += 1;

        if std::mem::take(&mut self.screenshot_requested) {
            self.take_screenshot();
        }

        self.throttle();
    }

    fn take_screenshot(&mut self) {
        let (width, height) = self.size;
        let path = self
            .screenshot_dir
            .join(format!("screenshot-{:06}.png", self.frames));
        match save_png(&TestPattern, &path, width, height) {
            Ok(_) => self.screenshots.push(path),
            Err(e) => error!("Failed to write screenshot {}: {}", path.display(), e),
        }
    }

    fn throttle(&mut self) {
        if let Some(last) = self.last_frame {
            let elapsed = last.elapsed();
            if elapsed < self.frame_budget {
                thread::sleep(self.frame_budget - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());
    }

    /// Log a one-line session summary
    pub fn report(&self) {
        info!(
            "{} frames, {} events, {} screenshots",
            self.frames,
            self.events,
            self.screenshots.len()
        );
    }
}
