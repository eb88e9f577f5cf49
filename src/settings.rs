//! Reactor settings
//!
//! Tuning knobs for spawning, reactions and the host layout. Stored as JSON;
//! every field has a default so partial files are accepted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ReactorError, Result};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized RGBA for GPU upload
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            1.0,
        ]
    }
}

/// Reactor settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorSettings {
    /// RNG seed for spawn placement (None = fresh seed each run)
    pub seed: Option<u64>,

    // === Spawning ===
    /// Slowest launch speed of a spawned molecule (sim units/s)
    pub spawn_speed_min: f64,
    /// Fastest launch speed of a spawned molecule (sim units/s)
    pub spawn_speed_max: f64,

    // === Reactions ===
    /// Launch speed of every fragmentation product
    pub fragment_speed: f64,

    // === Engine ===
    /// Host timer interval handed to `advance`
    pub tick_secs: f64,
    /// Display pixels per simulation unit
    pub coord_scale: f64,
    /// Resolved events allowed within one tick before drifting the rest
    pub max_events_per_tick: usize,

    // === Piston ===
    pub piston_min_percent: u32,
    pub piston_max_percent: u32,
    /// Initial piston share of the canvas width
    pub piston_percent: u32,

    // === Palette ===
    pub circle_color: Rgb,
    pub square_color: Rgb,
}

impl Default for ReactorSettings {
    fn default() -> Self {
        Self {
            seed: None,

            spawn_speed_min: 5.0,
            spawn_speed_max: 15.0,

            fragment_speed: 8.0,

            tick_secs: TICK_SECS,
            coord_scale: COORD_SCALE,
            max_events_per_tick: MAX_EVENTS_PER_TICK,

            piston_min_percent: PISTON_MIN_PERCENT,
            piston_max_percent: PISTON_MAX_PERCENT,
            piston_percent: PISTON_MIN_PERCENT,

            circle_color: Rgb::RED,
            square_color: Rgb::BLUE,
        }
    }
}

impl ReactorSettings {
    /// Same defaults with a fixed seed (reproducible runs)
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Reject values the engine can't run with
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(ReactorError::InvalidSettings(msg));

        if !(self.spawn_speed_min.is_finite() && self.spawn_speed_max.is_finite()) {
            return bad("spawn speeds must be finite".into());
        }
        if self.spawn_speed_min < 0.0 || self.spawn_speed_min > self.spawn_speed_max {
            return bad(format!(
                "spawn speed range {}..{} must satisfy 0 <= min <= max",
                self.spawn_speed_min, self.spawn_speed_max
            ));
        }
        if !self.fragment_speed.is_finite() || self.fragment_speed < 0.0 {
            return bad("fragment_speed must be finite and >= 0".into());
        }
        if !self.tick_secs.is_finite() || self.tick_secs <= 0.0 {
            return bad("tick_secs must be finite and > 0".into());
        }
        if !self.coord_scale.is_finite() || self.coord_scale <= 0.0 {
            return bad("coord_scale must be finite and > 0".into());
        }
        if self.max_events_per_tick == 0 {
            return bad("max_events_per_tick must be > 0".into());
        }
        if self.piston_min_percent > self.piston_max_percent || self.piston_max_percent >= 100 {
            return bad(format!(
                "piston range {}..{} must satisfy min <= max < 100",
                self.piston_min_percent, self.piston_max_percent
            ));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
