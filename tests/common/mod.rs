//! Common test doubles for the locator integration tests:
//! a manually-advanced clock, a scripted frame source, and a recording
//! input driver.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use image::{Rgba, RgbaImage};
use screenpilot::input::{ButtonDirection, PointerButton};
use screenpilot::{Clock, InputDriver, PilotResult, Raster, Rectangle, ScreenCapturer};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Pseudo-random grayscale pattern; misaligned windows are decorrelated,
/// so only the exact alignment of a cropped template scores near 1.0.
pub fn hashed(w: u32, h: u32) -> Raster {
    let img = RgbaImage::from_fn(w, h, |x, y| {
        let mut v = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA77);
        v ^= v >> 13;
        v = v.wrapping_mul(0xC2B2_AE3D);
        v ^= v >> 16;
        let v = (v & 0xFF) as u8;
        Rgba([v, v, v, 255])
    });
    Raster::from_rgba(img)
}

/// Featureless black frame. Zero-variance windows produce NaN correlation
/// scores and drop out of every match, so nothing is ever found here.
pub fn blank(w: u32, h: u32) -> Raster {
    Raster::from_rgba(RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255])))
}

/// Clock whose elapsed time is advanced by the test (or by the scripted
/// capturer standing in for attempt cost), never by real waiting.
pub struct ManualClock {
    base: Instant,
    elapsed: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new(elapsed: Rc<Cell<Duration>>) -> Self {
        Self {
            base: Instant::now(),
            elapsed,
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.elapsed.get()
    }
}

/// Frame source that plays back a script, then repeats a fallback frame.
/// Each capture advances the shared elapsed counter by `step`, simulating
/// the real cost of a capture+match attempt.
pub struct ScriptedCapturer {
    frames: VecDeque<PilotResult<Raster>>,
    fallback: Raster,
    step: Duration,
    elapsed: Rc<Cell<Duration>>,
    pub calls: Rc<Cell<u32>>,
    pub regions: Rc<RefCell<Vec<Option<Rectangle>>>>,
}

impl ScriptedCapturer {
    pub fn new(
        frames: Vec<PilotResult<Raster>>,
        fallback: Raster,
        step: Duration,
        elapsed: Rc<Cell<Duration>>,
    ) -> Self {
        Self {
            frames: frames.into(),
            fallback,
            step,
            elapsed,
            calls: Rc::new(Cell::new(0)),
            regions: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl ScreenCapturer for ScriptedCapturer {
    fn capture(&mut self, region: Option<&Rectangle>) -> PilotResult<Raster> {
        self.calls.set(self.calls.get() + 1);
        self.regions.borrow_mut().push(region.copied());
        self.elapsed.set(self.elapsed.get() + self.step);
        self.frames
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

/// Pointer/keyboard events as the driver saw them.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Move(i32, i32),
    Button(PointerButton, ButtonDirection),
    Text(String),
}

/// Driver that records events into a shared log instead of touching the OS.
pub struct SharedRecordingDriver {
    pub events: Rc<RefCell<Vec<InputEvent>>>,
}

impl SharedRecordingDriver {
    pub fn new(events: Rc<RefCell<Vec<InputEvent>>>) -> Self {
        Self { events }
    }
}

impl InputDriver for SharedRecordingDriver {
    fn move_to(&mut self, x: i32, y: i32) -> PilotResult<()> {
        self.events.borrow_mut().push(InputEvent::Move(x, y));
        Ok(())
    }

    fn button(&mut self, button: PointerButton, direction: ButtonDirection) -> PilotResult<()> {
        self.events
            .borrow_mut()
            .push(InputEvent::Button(button, direction));
        Ok(())
    }

    fn text(&mut self, text: &str) -> PilotResult<()> {
        self.events.borrow_mut().push(InputEvent::Text(text.to_string()));
        Ok(())
    }
}
