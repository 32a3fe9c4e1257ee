//! # Configuration
//!
//! Per-call search settings and the process-wide session defaults.
//!
//! Every locator call takes an explicit [`SearchConfig`]; the session-level
//! entry points ([`set_session_config`]/[`session_config`]) exist only as an
//! ergonomic default for suites that configure once at startup. Mutating the
//! session config while searches are in flight is caller misuse: in-flight
//! calls keep the config they were started with.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PilotError, PilotResult};
use crate::geometry::{Point, Rectangle};

/// Default similarity threshold; higher is stricter.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.92;

/// Default search timeout in seconds.
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 30;

/// Settings for a single search call. Immutable once the call starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Normalized similarity a candidate must reach, in (0, 1].
    pub similarity_threshold: f32,
    /// Wall-clock search budget. Zero means exactly one capture+match cycle.
    pub wait_timeout_secs: u64,
    /// Downsampled pre-pass before the full-resolution match.
    pub fast_pre_pass: bool,
    /// Sub-rectangle of the screen to capture. `x`/`y` skip that many
    /// pixels from the screen origin; a non-positive width or height falls
    /// back to the screen's own bounds.
    pub capture_region: Option<Rectangle>,
    /// Correction added to reported coordinates to translate a cropped
    /// region match back to full-screen space. Components are applied only
    /// when strictly positive.
    pub region_offset: Option<Point>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            wait_timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
            fast_pre_pass: true,
            capture_region: None,
            region_offset: None,
        }
    }
}

impl SearchConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    /// Reject out-of-range thresholds before any capture work starts.
    pub fn validate(&self) -> PilotResult<()> {
        if self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0 {
            Ok(())
        } else {
            Err(PilotError::InvalidThreshold(self.similarity_threshold))
        }
    }
}

/// Whole-engine configuration: search defaults plus the debug side-channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    pub search: SearchConfig,
    /// Root directory for per-run debug captures. `None` disables recording.
    pub debug_output_path: Option<PathBuf>,
}

impl PilotConfig {
    pub fn load(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, path: &Path) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = std::fs::write(path, json);
        }
    }
}

static SESSION: LazyLock<RwLock<PilotConfig>> =
    LazyLock::new(|| RwLock::new(PilotConfig::default()));

/// Install the session-wide default configuration. Call once at suite
/// startup, before any concurrent searches exist.
pub fn set_session_config(config: PilotConfig) {
    *SESSION.write().unwrap() = config;
}

/// Snapshot of the session-wide default configuration.
pub fn session_config() -> PilotConfig {
    SESSION.read().unwrap().clone()
}
