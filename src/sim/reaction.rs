//! Reaction rules
//!
//! When two live molecules touch, the pair of shapes selects a reaction
//! function. The function reads both reactants and returns the molecules that
//! replace them; the engine is responsible for retiring the reactants.
//!
//! - Circle + Square: fusion into one heavier square
//! - Circle + Circle, Square + Square: fragmentation into unit circles

use std::collections::HashMap;
use std::f64::consts::TAU;

use glam::DVec2;

use super::molecule::{Molecule, PhysicalState, Shape};
use crate::consts::CIRCLE_BASE_RADIUS;
use crate::error::{ReactorError, Result};
use crate::rotate;
use crate::settings::{ReactorSettings, Rgb};

/// Tunables a reaction may read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionParams {
    /// Launch speed of fragmentation products
    pub fragment_speed: f64,
    pub circle_color: Rgb,
    pub square_color: Rgb,
}

impl Default for ReactionParams {
    fn default() -> Self {
        Self::from(&ReactorSettings::default())
    }
}

impl From<&ReactorSettings> for ReactionParams {
    fn from(settings: &ReactorSettings) -> Self {
        Self {
            fragment_speed: settings.fragment_speed,
            circle_color: settings.circle_color,
            square_color: settings.square_color,
        }
    }
}

/// Consumes two reactants, produces their replacements
pub type ReactionFn = fn(&Molecule, &Molecule, &ReactionParams) -> Result<Vec<Molecule>>;

/// Dispatch table keyed by shape pair, symmetric by construction
#[derive(Clone)]
pub struct ReactionTable {
    rules: HashMap<(Shape, Shape), ReactionFn>,
}

impl std::fmt::Debug for ReactionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<_> = self.rules.keys().collect();
        keys.sort();
        f.debug_struct("ReactionTable").field("pairs", &keys).finish()
    }
}

impl Default for ReactionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ReactionTable {
    /// Table with no rules
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Fusion for unlike shapes, fragmentation for like shapes
    pub fn standard() -> Self {
        let mut table = Self::empty();
        table.insert(Shape::Circle, Shape::Circle, fragmentation);
        table.insert(Shape::Square, Shape::Square, fragmentation);
        table.insert(Shape::Circle, Shape::Square, fusion);
        table
    }

    /// Register a rule under both orderings of the pair
    pub fn insert(&mut self, a: Shape, b: Shape, rule: ReactionFn) {
        self.rules.insert((a, b), rule);
        self.rules.insert((b, a), rule);
    }

    pub fn lookup(&self, a: Shape, b: Shape) -> Option<ReactionFn> {
        self.rules.get(&(a, b)).copied()
    }

    /// True if every shape pair has a rule
    pub fn is_complete(&self) -> bool {
        Shape::ALL
            .iter()
            .all(|&a| Shape::ALL.iter().all(|&b| self.rules.contains_key(&(a, b))))
    }
}

/// Combined mass of two reactants. Errors: `InvalidMass` if it overflows.
fn combined_mass(a: &Molecule, b: &Molecule) -> Result<u32> {
    a.mass()
        .checked_add(b.mass())
        .ok_or(ReactorError::InvalidMass(u32::MAX))
}

/// Midpoint of the two reactant centers
#[inline]
fn collision_center(a: &Molecule, b: &Molecule) -> DVec2 {
    a.position() + (b.position() - a.position()) * 0.5
}

/// Radius of the fragment ring for `count` fragments
pub fn fragment_ring_radius(count: u32) -> f64 {
    let n = f64::from(count);
    (2.0 / (TAU / n).sin()).sqrt() * CIRCLE_BASE_RADIUS * 2.0
}

/// Unlike shapes merge: one square carrying the total mass and the
/// mass-weighted mean velocity, placed at the collision midpoint
pub fn fusion(a: &Molecule, b: &Molecule, params: &ReactionParams) -> Result<Vec<Molecule>> {
    let mass = combined_mass(a, b)?;
    let vel = (a.velocity() * f64::from(a.mass()) + b.velocity() * f64::from(b.mass()))
        / f64::from(mass);

    let product = Molecule::new(
        Shape::Square,
        collision_center(a, b),
        vel,
        mass,
        params.square_color,
    )?
    .with_state(PhysicalState::Unresponsive);

    Ok(vec![product])
}

/// Like shapes shatter into `mass_a + mass_b` unit circles on a ring around the
/// collision midpoint, each flying radially outward, evenly spaced
pub fn fragmentation(a: &Molecule, b: &Molecule, params: &ReactionParams) -> Result<Vec<Molecule>> {
    let count = combined_mass(a, b)?;
    let center = collision_center(a, b);
    let ring = fragment_ring_radius(count);
    let step = TAU / f64::from(count);

    (0..count)
        .map(|k| {
            let dir = rotate(DVec2::new(0.0, -1.0), step * f64::from(k));
            Molecule::new(
                Shape::Circle,
                center + dir * ring,
                dir * params.fragment_speed,
                1,
                params.circle_color,
            )
            .map(|m| m.with_state(PhysicalState::Unresponsive))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ReactionParams {
        ReactionParams::default()
    }

    #[test]
    fn test_standard_table_is_complete_and_symmetric() {
        let table = ReactionTable::standard();
        assert!(table.is_complete());
        for a in Shape::ALL {
            for b in Shape::ALL {
                let ab = table.lookup(a, b).expect("rule");
                let ba = table.lookup(b, a).expect("rule");
                assert_eq!(ab as usize, ba as usize);
            }
        }
        assert_eq!(
            table.lookup(Shape::Circle, Shape::Square).map(|f| f as usize),
            Some(fusion as ReactionFn as usize)
        );
    }

    #[test]
    fn test_empty_table_incomplete() {
        let mut table = ReactionTable::empty();
        assert!(!table.is_complete());
        assert!(table.lookup(Shape::Circle, Shape::Circle).is_none());
        table.insert(Shape::Square, Shape::Circle, fusion);
        assert!(table.lookup(Shape::Circle, Shape::Square).is_some());
        assert!(!table.is_complete());
    }

    #[test]
    fn test_fusion_conserves_mass_and_averages_velocity() {
        let a = Molecule::circle(DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0), 1).unwrap();
        let b = Molecule::square(DVec2::new(2.0, 0.0), DVec2::new(0.0, 1.0), 1).unwrap();

        let out = fusion(&a, &b, &params()).unwrap();
        assert_eq!(out.len(), 1);
        let sq = &out[0];
        assert_eq!(sq.shape(), Shape::Square);
        assert_eq!(sq.mass(), 2);
        assert_eq!(sq.velocity(), DVec2::new(0.5, 0.5));
        assert_eq!(sq.position(), DVec2::new(1.0, 0.0));
        assert_eq!(sq.state(), PhysicalState::Unresponsive);
    }

    #[test]
    fn test_fusion_weights_by_mass() {
        let a = Molecule::circle(DVec2::ZERO, DVec2::new(4.0, 0.0), 3).unwrap();
        let b = Molecule::square(DVec2::X, DVec2::ZERO, 1).unwrap();
        let out = fusion(&b, &a, &params()).unwrap();
        assert_eq!(out[0].mass(), 4);
        assert_eq!(out[0].velocity(), DVec2::new(3.0, 0.0));
    }

    #[test]
    fn test_fragmentation_ring() {
        let a = Molecule::circle(DVec2::new(10.0, 10.0), DVec2::X, 1).unwrap();
        let b = Molecule::circle(DVec2::new(12.0, 10.0), -DVec2::X, 3).unwrap();

        let out = fragmentation(&a, &b, &params()).unwrap();
        assert_eq!(out.len(), 4);

        let center = DVec2::new(11.0, 10.0);
        let ring = fragment_ring_radius(4);
        // sin(2π/4) = 1, so the ring is sqrt(2) * 2
        assert!((ring - 2.0 * 2f64.sqrt()).abs() < 1e-12);

        let mut total_angle = 0.0;
        for (k, m) in out.iter().enumerate() {
            assert_eq!(m.shape(), Shape::Circle);
            assert_eq!(m.mass(), 1);
            assert_eq!(m.state(), PhysicalState::Unresponsive);
            let offset = m.position() - center;
            assert!((offset.length() - ring).abs() < 1e-9);
            // Launched radially outward
            assert!(offset.normalize().abs_diff_eq(m.velocity().normalize(), 1e-9));
            assert!((m.velocity().length() - params().fragment_speed).abs() < 1e-9);

            let next = &out[(k + 1) % out.len()];
            let gap = (m.position() - center).angle_to(next.position() - center);
            let gap = if gap < 0.0 { gap + TAU } else { gap };
            assert!((gap - TAU / 4.0).abs() < 1e-9);
            total_angle += gap;
        }
        assert!((total_angle - TAU).abs() < 1e-9);

        // First fragment heads along (0, -1)
        assert!(out[0].velocity().normalize().abs_diff_eq(DVec2::new(0.0, -1.0), 1e-12));
    }

    #[test]
    fn test_mass_overflow_is_an_error() {
        let heavy = Molecule::circle(DVec2::ZERO, DVec2::ZERO, u32::MAX).unwrap();
        let light = Molecule::square(DVec2::X, DVec2::ZERO, 1).unwrap();
        assert!(matches!(fusion(&heavy, &light, &params()), Err(ReactorError::InvalidMass(_))));

        let light = Molecule::circle(DVec2::X, DVec2::ZERO, 1).unwrap();
        assert!(matches!(
            fragmentation(&heavy, &light, &params()),
            Err(ReactorError::InvalidMass(_))
        ));
    }

    #[test]
    fn test_square_pairs_fragment_into_circles() {
        let a = Molecule::square(DVec2::ZERO, DVec2::ZERO, 2).unwrap();
        let b = Molecule::square(DVec2::X, DVec2::ZERO, 3).unwrap();
        let out = fragmentation(&a, &b, &params()).unwrap();
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|m| m.shape() == Shape::Circle && m.mass() == 1));
    }
}
