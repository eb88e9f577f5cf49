//! Reactor Core - an event-driven molecule reactor
//!
//! Circles and squares drift through a rectangular arena, bounce off its walls
//! and react on contact: unlike shapes fuse, like shapes fragment.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, molecules, reactions, event loop)
//! - `layout`: Piston/core split of the host canvas
//! - `recorder`: Rolling time series of reactor observables
//! - `render`: Read-only snapshot records for a renderer
//! - `settings`: Data-driven tuning, loaded from JSON

pub mod error;
pub mod layout;
pub mod recorder;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::{ReactorError, Result};
pub use layout::{ReactorLayout, Rect};
pub use recorder::{Recorder, Sample};
pub use settings::{ReactorSettings, Rgb};
pub use sim::{Molecule, PhysicalState, ReactorCore, Shape, TickStats};

use glam::DVec2;

/// Simulation constants
pub mod consts {
    /// Default host tick (~60 Hz timer)
    pub const TICK_SECS: f64 = 0.016;

    /// Display pixels per simulation unit
    pub const COORD_SCALE: f64 = 10.0;

    /// Radius of a unit-mass circle
    pub const CIRCLE_BASE_RADIUS: f64 = 1.0;
    /// Side length of a unit-mass square
    pub const SQUARE_BASE_SIDE: f64 = 2.0;

    /// Events closer than this are treated as simultaneous
    pub const EPS_TIME: f64 = 1e-9;

    /// Hard cap on resolved events within one `advance`
    pub const MAX_EVENTS_PER_TICK: usize = 4096;

    /// Piston slider range, in percent of canvas width
    pub const PISTON_MIN_PERCENT: u32 = 10;
    pub const PISTON_MAX_PERCENT: u32 = 80;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: DVec2, angle: f64) -> DVec2 {
    DVec2::from_angle(angle).rotate(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(DVec2::X, FRAC_PI_2);
        assert!(v.abs_diff_eq(DVec2::Y, 1e-12));

        let v = rotate(DVec2::new(0.0, -1.0), PI);
        assert!(v.abs_diff_eq(DVec2::Y, 1e-12));
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(2.0, PI);
        assert!(p.abs_diff_eq(DVec2::new(-2.0, 0.0), 1e-12));
    }
}
