//! Molecules: the reactor's particles
//!
//! A molecule is a circle or a square. Shape-dependent quantities (size and
//! collision radius) come from a per-shape function table and are fixed at
//! construction from the mass. Molecules never touch each other or the arena;
//! all interaction logic lives in the engine and the reaction table.

use std::f64::consts::SQRT_2;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CIRCLE_BASE_RADIUS, SQUARE_BASE_SIDE};
use crate::error::{ReactorError, Result};
use crate::settings::Rgb;

/// Molecule variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Shape {
    Circle,
    Square,
}

impl Shape {
    pub const ALL: [Shape; 2] = [Shape::Circle, Shape::Square];

    /// Radius (circle) or side length (square) for a given mass
    pub fn size_for_mass(self, mass: u32) -> f64 {
        let m = f64::from(mass).sqrt();
        match self {
            Shape::Circle => CIRCLE_BASE_RADIUS * m,
            Shape::Square => SQUARE_BASE_SIDE * m,
        }
    }

    /// Radius of the circular collision proxy
    pub fn collision_radius(self, size: f64) -> f64 {
        match self {
            Shape::Circle => size,
            // Bounding circle of the square
            Shape::Square => size / SQRT_2,
        }
    }

    /// Default palette color
    pub fn default_color(self) -> Rgb {
        match self {
            Shape::Circle => Rgb::RED,
            Shape::Square => Rgb::BLUE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Circle => "Circle",
            Shape::Square => "Square",
        }
    }
}

/// Lifecycle of a molecule within the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhysicalState {
    /// Takes part in wall and pair events
    Alive,
    /// Freshly created; ignored by event search until the tick ends
    Unresponsive,
    /// Consumed by a reaction; swept at the end of the tick
    Dead,
}

/// A simulated body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    /// Assigned by the engine on insertion (0 = not yet inserted)
    id: u32,
    shape: Shape,
    pos: DVec2,
    vel: DVec2,
    mass: u32,
    color: Rgb,
    size: f64,
    collision_radius: f64,
    state: PhysicalState,
}

impl Molecule {
    /// Build a molecule, deriving size and collision radius from the mass.
    ///
    /// Errors: `InvalidMass` if `mass` is zero.
    pub fn new(shape: Shape, pos: DVec2, vel: DVec2, mass: u32, color: Rgb) -> Result<Self> {
        if mass < 1 {
            return Err(ReactorError::InvalidMass(mass));
        }
        let size = shape.size_for_mass(mass);
        Ok(Self {
            id: 0,
            shape,
            pos,
            vel,
            mass,
            color,
            size,
            collision_radius: shape.collision_radius(size),
            state: PhysicalState::Alive,
        })
    }

    /// Circle in the default palette color
    pub fn circle(pos: DVec2, vel: DVec2, mass: u32) -> Result<Self> {
        Self::new(Shape::Circle, pos, vel, mass, Shape::Circle.default_color())
    }

    /// Square in the default palette color
    pub fn square(pos: DVec2, vel: DVec2, mass: u32) -> Result<Self> {
        Self::new(Shape::Square, pos, vel, mass, Shape::Square.default_color())
    }

    /// Same molecule, created in the given state
    pub fn with_state(mut self, state: PhysicalState) -> Self {
        self.state = state;
        self
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.pos
    }

    #[inline]
    pub fn velocity(&self) -> DVec2 {
        self.vel
    }

    #[inline]
    pub fn mass(&self) -> u32 {
        self.mass
    }

    #[inline]
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Radius for circles, side length for squares
    #[inline]
    pub fn size(&self) -> f64 {
        self.size
    }

    #[inline]
    pub fn collision_radius(&self) -> f64 {
        self.collision_radius
    }

    #[inline]
    pub fn state(&self) -> PhysicalState {
        self.state
    }

    /// True if the molecule takes part in event search
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state == PhysicalState::Alive
    }

    pub fn set_position(&mut self, pos: DVec2) {
        self.pos = pos;
    }

    pub fn set_velocity(&mut self, vel: DVec2) {
        self.vel = vel;
    }

    pub fn set_state(&mut self, state: PhysicalState) {
        self.state = state;
    }

    /// Linear motion over `dt`
    #[inline]
    pub(crate) fn drift(&mut self, dt: f64) {
        self.pos += self.vel * dt;
    }

    /// Kinetic energy: 1/2 m |v|^2
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * f64::from(self.mass) * self.vel.length_squared()
    }
}
