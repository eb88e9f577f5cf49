//! Deterministic simulation module
//!
//! All reactor physics lives here. This module must stay deterministic:
//! - Seeded RNG only (spawns)
//! - Stable iteration order (insertion order, ties broken by molecule id)
//! - No rendering or platform dependencies

pub mod arena;
pub mod engine;
pub mod event;
pub mod geometry;
pub mod molecule;
pub mod reaction;

pub use arena::{Arena, Wall, WallSide};
pub use engine::{ReactorCore, TickStats, contact_time};
pub use event::{Event, EventKind};
pub use geometry::{Line, Ray, Roots, intersect, intersect_param, reflect, solve_quadratic};
pub use molecule::{Molecule, PhysicalState, Shape};
pub use reaction::{ReactionFn, ReactionParams, ReactionTable, fragmentation, fusion};
