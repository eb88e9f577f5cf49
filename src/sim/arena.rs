//! Arena geometry and display mapping
//!
//! The arena is the reactor core rectangle. It lives in display space (the
//! host's pixels) and is mapped to simulation space by a uniform scale, with
//! y pointing down. Simulation space shares its origin with the display frame,
//! so the walls sit at `rect / scale` and resizing the core only moves walls.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Line, Ray, intersect_param, reflect};
use crate::error::{ReactorError, Result};
use crate::layout::Rect;

/// One of the four boundary walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WallSide {
    Upper,
    Left,
    Lower,
    Right,
}

impl WallSide {
    /// Iteration order used for event tie-breaks
    pub const ALL: [WallSide; 4] = [WallSide::Upper, WallSide::Left, WallSide::Lower, WallSide::Right];

    /// Unit normal pointing out of the arena
    pub fn outward_normal(self) -> DVec2 {
        match self {
            WallSide::Upper => DVec2::new(0.0, -1.0),
            WallSide::Left => DVec2::new(-1.0, 0.0),
            WallSide::Lower => DVec2::new(0.0, 1.0),
            WallSide::Right => DVec2::new(1.0, 0.0),
        }
    }

    /// True for walls that flip the y velocity component
    pub fn is_horizontal(self) -> bool {
        matches!(self, WallSide::Upper | WallSide::Lower)
    }
}

/// A boundary wall as an infinite line in simulation space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub side: WallSide,
    pub line: Line,
}

impl Wall {
    /// Time until a molecule at `pos` moving with `vel` brings its collision
    /// proxy into contact with this wall.
    ///
    /// Only walls the molecule is moving toward count, except that a molecule
    /// already past the contact line (e.g. after the arena shrank) gets an
    /// immediate event whatever its heading.
    pub fn time_to_contact(&self, pos: DVec2, vel: DVec2, radius: f64) -> Option<f64> {
        let normal = self.side.outward_normal();
        let contact = Line::new(self.line.origin - normal * radius, self.line.dir);
        if (pos - contact.origin).dot(normal) > 0.0 {
            return Some(0.0);
        }
        if vel.dot(normal) <= 0.0 {
            return None;
        }
        intersect_param(&Ray::new(pos, vel), &contact).map(|t| t.max(0.0))
    }

    /// Reflect the velocity component perpendicular to this wall if it
    /// points out of the arena
    #[inline]
    pub fn bounce(&self, vel: DVec2) -> DVec2 {
        let normal = self.side.outward_normal();
        if vel.dot(normal) > 0.0 {
            reflect(vel, normal)
        } else {
            vel
        }
    }

    /// Move `pos` onto the contact line for a proxy of `radius`
    pub fn snap(&self, pos: DVec2, radius: f64) -> DVec2 {
        let normal = self.side.outward_normal();
        let contact = self.line.origin - normal * radius;
        if self.side.is_horizontal() {
            DVec2::new(pos.x, contact.y)
        } else {
            DVec2::new(contact.x, pos.y)
        }
    }
}

/// Bounded simulation space and its display mapping
#[derive(Debug, Clone, PartialEq)]
pub struct Arena {
    /// Core rectangle in display space
    rect: Rect,
    /// Display units per simulation unit
    scale: f64,
    /// Upper-left corner in simulation space
    min: DVec2,
    /// Lower-right corner in simulation space
    max: DVec2,
    walls: [Wall; 4],
}

impl Arena {
    /// Errors: `InvalidArena` unless width, height and scale are finite and > 0.
    pub fn new(rect: Rect, scale: f64) -> Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !(valid(rect.width) && valid(rect.height) && valid(scale))
            || !(rect.x.is_finite() && rect.y.is_finite())
        {
            return Err(ReactorError::InvalidArena {
                width: rect.width,
                height: rect.height,
                scale,
            });
        }
        let min = DVec2::new(rect.x, rect.y) / scale;
        let max = DVec2::new(rect.right(), rect.bottom()) / scale;
        Ok(Self {
            rect,
            scale,
            min,
            max,
            walls: Self::build_walls(min, max),
        })
    }

    /// Arena spanning `[0, width] × [0, height]` at scale 1
    pub fn with_size(width: f64, height: f64) -> Result<Self> {
        Self::new(Rect::new(0.0, 0.0, width, height), 1.0)
    }

    fn build_walls(min: DVec2, max: DVec2) -> [Wall; 4] {
        WallSide::ALL.map(|side| {
            let line = match side {
                WallSide::Upper => Line::new(DVec2::new(0.0, min.y), DVec2::X),
                WallSide::Left => Line::new(DVec2::new(min.x, 0.0), DVec2::Y),
                WallSide::Lower => Line::new(DVec2::new(0.0, max.y), DVec2::X),
                WallSide::Right => Line::new(DVec2::new(max.x, 0.0), DVec2::Y),
            };
            Wall { side, line }
        })
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    pub fn min(&self) -> DVec2 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> DVec2 {
        self.max
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn walls(&self) -> &[Wall; 4] {
        &self.walls
    }

    pub fn wall(&self, side: WallSide) -> &Wall {
        &self.walls[side as usize]
    }

    /// Simulation space to display space. The mapping only depends on the
    /// scale, so moving a wall never moves a molecule on screen.
    #[inline]
    pub fn to_display(&self, p: DVec2) -> DVec2 {
        p * self.scale
    }

    /// True if a proxy of `radius` centered at `pos` lies fully inside
    pub fn contains(&self, pos: DVec2, radius: f64) -> bool {
        pos.x >= self.min.x + radius
            && pos.y >= self.min.y + radius
            && pos.x <= self.max.x - radius
            && pos.y <= self.max.y - radius
    }

    /// Pull a center into the region where a proxy of `radius` fits.
    /// Axes narrower than the proxy collapse to the arena midline.
    pub fn clamp_inside(&self, pos: DVec2, radius: f64) -> DVec2 {
        let axis = |v: f64, lo: f64, hi: f64| {
            if hi - lo <= 2.0 * radius {
                (lo + hi) * 0.5
            } else {
                v.clamp(lo + radius, hi - radius)
            }
        };
        DVec2::new(
            axis(pos.x, self.min.x, self.max.x),
            axis(pos.y, self.min.y, self.max.y),
        )
    }
}
