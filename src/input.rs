//! # Input synthesis
//!
//! Translates a resolved screen coordinate and an action specification into
//! OS-level synthetic pointer events and keyboard text injection.
//!
//! The enigo crate does the actual event posting; the [`InputDriver`] trait
//! sits between so tests can record the event stream instead of moving the
//! real cursor. Within one click: button-down always precedes the optional
//! drag move, which always precedes button-up, which always precedes the
//! second pair of a double-click.

use std::thread;
use std::time::Duration;

use enigo::{Button, Coordinate, Direction, Enigo, Keyboard, Mouse, Settings};
use serde::{Deserialize, Serialize};

use crate::error::{PilotError, PilotResult};
use crate::geometry::Point;

/// Pause between a button press and its release, and between the two halves
/// of a double-click. OS input queues collapse pairs that arrive faster.
pub const SETTLE_DELAY: Duration = Duration::from_millis(40);

/// What to do at a located position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    MoveOnly,
    Click,
    RightClick,
    DoubleClick,
}

/// A pointer action against a located template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub kind: ActionKind,
    /// Offset from the match's top-left to the click point. `None` means
    /// the template's own center; the locator resolves that before the
    /// spec reaches the synthesizer.
    pub click_offset: Option<Point>,
    /// When set, the pointer moves here between button-down and button-up.
    pub drag_target: Option<Point>,
}

impl ActionSpec {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            click_offset: None,
            drag_target: None,
        }
    }

    /// Plain left click on the template center.
    pub fn click() -> Self {
        Self::new(ActionKind::Click)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonDirection {
    Press,
    Release,
}

/// The seam to the OS input queue.
pub trait InputDriver {
    fn move_to(&mut self, x: i32, y: i32) -> PilotResult<()>;
    fn button(&mut self, button: PointerButton, direction: ButtonDirection) -> PilotResult<()>;
    fn text(&mut self, text: &str) -> PilotResult<()>;
}

/// Production driver posting through enigo.
pub struct EnigoDriver {
    enigo: Enigo,
}

impl EnigoDriver {
    pub fn new() -> PilotResult<Self> {
        let enigo =
            Enigo::new(&Settings::default()).map_err(|e| PilotError::Input(e.to_string()))?;
        Ok(Self { enigo })
    }
}

impl InputDriver for EnigoDriver {
    fn move_to(&mut self, x: i32, y: i32) -> PilotResult<()> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| PilotError::Input(e.to_string()))
    }

    fn button(&mut self, button: PointerButton, direction: ButtonDirection) -> PilotResult<()> {
        let button = match button {
            PointerButton::Left => Button::Left,
            PointerButton::Right => Button::Right,
        };
        let direction = match direction {
            ButtonDirection::Press => Direction::Press,
            ButtonDirection::Release => Direction::Release,
        };
        self.enigo
            .button(button, direction)
            .map_err(|e| PilotError::Input(e.to_string()))
    }

    fn text(&mut self, text: &str) -> PilotResult<()> {
        self.enigo
            .text(text)
            .map_err(|e| PilotError::Input(e.to_string()))
    }
}

/// Drives pointer and keyboard actions through an [`InputDriver`].
pub struct InputSynthesizer<D> {
    driver: D,
}

impl<D: InputDriver> InputSynthesizer<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    /// Execute `spec` at `at` (the match's top-left).
    pub fn click(&mut self, at: Point, spec: &ActionSpec) -> PilotResult<()> {
        let offset = spec.click_offset.unwrap_or_default();
        let target = at.offset_by(offset);
        log::debug!("pointer {:?} at ({}, {})", spec.kind, target.x, target.y);

        self.driver.move_to(target.x, target.y)?;
        if spec.kind == ActionKind::MoveOnly {
            return Ok(());
        }

        let button = match spec.kind {
            ActionKind::RightClick => PointerButton::Right,
            _ => PointerButton::Left,
        };
        self.press_release(button, spec.drag_target)?;
        if spec.kind == ActionKind::DoubleClick {
            thread::sleep(SETTLE_DELAY);
            self.press_release(button, None)?;
        }
        Ok(())
    }

    /// Inject `text` as a sequence of synthetic keystrokes, in order.
    pub fn type_text(&mut self, text: &str) -> PilotResult<()> {
        log::debug!("typing {} characters", text.chars().count());
        self.driver.text(text)
    }

    fn press_release(&mut self, button: PointerButton, drag: Option<Point>) -> PilotResult<()> {
        self.driver.button(button, ButtonDirection::Press)?;
        if let Some(target) = drag {
            self.driver.move_to(target.x, target.y)?;
        }
        thread::sleep(SETTLE_DELAY);
        self.driver.button(button, ButtonDirection::Release)
    }
}
