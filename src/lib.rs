//! Screenpilot locates a reference image (a "template") on the live screen
//! and drives synthetic pointer/keyboard input against the located
//! position, for automated desktop UI testing.
//!
//! The pipeline: [`capture`] produces a fresh [`Raster`] frame of the
//! display, [`optimizer`] searches it with a downsampled fast pre-pass and
//! a full-resolution NCC fallback from [`matcher`], and [`Locator`] wraps
//! both in a timeout-bounded polling loop with region correction, optional
//! per-attempt [`debug_record`] persistence, and [`input`] synthesis for
//! click-and-type flows.

pub mod capture;
pub mod clock;
pub mod config;
pub mod debug_record;
pub mod error;
pub mod geometry;
pub mod input;
pub mod locator;
pub mod matcher;
pub mod optimizer;
pub mod raster;

pub use capture::{PrimaryScreenCapturer, ScreenCapturer};
pub use clock::{Clock, SystemClock};
pub use config::{PilotConfig, SearchConfig, session_config, set_session_config};
pub use debug_record::{DebugRecorder, DebugTrace};
pub use error::{PilotError, PilotResult};
pub use geometry::{Point, Rectangle};
pub use input::{ActionKind, ActionSpec, EnigoDriver, InputDriver, InputSynthesizer};
pub use locator::Locator;
pub use matcher::{MatchResult, find_matches};
pub use optimizer::{DOWNSAMPLE_FACTOR, locate};
pub use raster::{PixelFormat, Raster};
