//! Reactor recorder
//!
//! Keeps the most recent samples of the reactor's observables for a scrolling
//! plot. Samples are appended once per tick; the oldest fall off the front.

use std::collections::VecDeque;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::{ReactorCore, Shape};

/// Default number of samples to keep
pub const MAX_POINTS: usize = 200;

/// One snapshot of reactor observables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Simulation time (s)
    pub time: f64,
    pub circles: usize,
    pub squares: usize,
    pub total_mass: u64,
    pub kinetic_energy: f64,
}

impl Sample {
    pub fn capture(core: &ReactorCore) -> Self {
        Self {
            time: core.time(),
            circles: core.count(Shape::Circle),
            squares: core.count(Shape::Square),
            total_mass: core.total_mass(),
            kinetic_energy: core.kinetic_energy(),
        }
    }
}

/// Bounded time series of samples
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recorder {
    max_points: usize,
    samples: VecDeque<Sample>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new(MAX_POINTS)
    }
}

impl Recorder {
    /// `max_points` of zero is bumped to one
    pub fn new(max_points: usize) -> Self {
        let max_points = max_points.max(1);
        Self {
            max_points,
            samples: VecDeque::with_capacity(max_points),
        }
    }

    /// Append a sample of the reactor's current state
    pub fn record(&mut self, core: &ReactorCore) {
        self.push(Sample::capture(core));
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.max_points {
            self.samples.pop_front();
        }
    }

    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Samples from the last `secs` seconds (relative to the newest sample)
    pub fn window(&self, secs: f64) -> impl Iterator<Item = &Sample> {
        let since = self.latest().map_or(f64::NEG_INFINITY, |s| s.time - secs);
        self.samples.iter().filter(move |s| s.time >= since)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the series as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Recorder saved ({} samples)", self.samples.len());
        Ok(())
    }
}
