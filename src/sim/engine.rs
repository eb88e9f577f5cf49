//! Reactor core: the event-driven simulation engine
//!
//! Each `advance(dt)` drains events in time order:
//! 1. search every live pair and every (live molecule, wall) for the earliest event
//! 2. if none falls inside the remaining budget, drift everything linearly and stop
//! 3. otherwise drift to the event, resolve exactly that one event, repeat
//! 4. sweep: drop dead molecules, wake unresponsive ones
//!
//! The loop is capped per tick; once the cap is hit the leftover time is
//! drifted without events so the tick still consumes exactly `dt`.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::arena::Arena;
use super::event::{Earliest, Event, EventKind};
use super::geometry::solve_quadratic;
use super::molecule::{Molecule, PhysicalState, Shape};
use super::reaction::{ReactionParams, ReactionTable};
use crate::consts::EPS_TIME;
use crate::error::{ReactorError, Result};
use crate::layout::{ReactorLayout, Rect};
use crate::polar_to_cartesian;
use crate::render::MoleculeView;
use crate::settings::ReactorSettings;

/// What happened during one `advance`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickStats {
    /// Every linear drift taken, in order; sums to the tick length
    pub substeps: Vec<f64>,
    pub wall_bounces: usize,
    pub reactions: usize,
    /// The per-tick event cap was reached
    pub capped: bool,
}

impl TickStats {
    /// Total drifted time
    pub fn elapsed(&self) -> f64 {
        self.substeps.iter().sum()
    }

    /// Resolved events
    pub fn events(&self) -> usize {
        self.wall_bounces + self.reactions
    }
}

/// Time until two molecules' collision proxies touch.
///
/// Solves |P + V t| = r_sum for the relative position P and velocity V and
/// keeps the earlier root. A root just behind the present (rounding after a
/// simultaneous event was resolved) counts as contact now if the pair is
/// still closing. Overlapping or receding pairs have no event.
pub fn contact_time(a: &Molecule, b: &Molecule) -> Option<f64> {
    let p = b.position() - a.position();
    let v = b.velocity() - a.velocity();
    let r_sum = a.collision_radius() + b.collision_radius();

    let t = solve_quadratic(v.dot(v), 2.0 * p.dot(v), p.dot(p) - r_sum * r_sum).smallest()?;
    if t >= 0.0 {
        Some(t)
    } else if t > -EPS_TIME && p.dot(v) < 0.0 {
        Some(0.0)
    } else {
        None
    }
}

/// The reactor engine. Owns every molecule; the outside only gets read access.
#[derive(Debug)]
pub struct ReactorCore {
    arena: Arena,
    molecules: Vec<Molecule>,
    /// Simulation clock (seconds since construction)
    time: f64,
    settings: ReactorSettings,
    reactions: ReactionTable,
    params: ReactionParams,
    seed: u64,
    rng: Pcg32,
    next_id: u32,
}

impl ReactorCore {
    /// Create an empty reactor over the display rectangle `rect`.
    ///
    /// Errors: invalid settings or a degenerate arena.
    pub fn new(rect: Rect, scale: f64, settings: ReactorSettings) -> Result<Self> {
        settings.validate()?;
        let arena = Arena::new(rect, scale)?;
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        log::info!(
            "Reactor core {:.1}x{:.1} (scale {}), seed {}",
            arena.width(),
            arena.height(),
            scale,
            seed
        );

        Ok(Self {
            arena,
            molecules: Vec::new(),
            time: 0.0,
            params: ReactionParams::from(&settings),
            settings,
            reactions: ReactionTable::standard(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        })
    }

    /// Reactor sized to the core rectangle of a layout
    pub fn from_layout(layout: &ReactorLayout, settings: ReactorSettings) -> Result<Self> {
        let scale = settings.coord_scale;
        Self::new(layout.core_rect(), scale, settings)
    }

    /// Replace the reaction rules
    pub fn with_reactions(mut self, reactions: ReactionTable) -> Self {
        if !reactions.is_complete() {
            log::warn!("Reaction table is missing shape pairs: {:?}", reactions);
        }
        self.reactions = reactions;
        self
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[inline]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    #[inline]
    pub fn settings(&self) -> &ReactorSettings {
        &self.settings
    }

    /// Update bounds and display mapping. Molecules are not moved, neither in
    /// simulation nor in display space; any left outside are corrected by
    /// their next wall check.
    pub fn set_arena(&mut self, rect: Rect, scale: f64) -> Result<()> {
        self.arena = Arena::new(rect, scale)?;
        log::info!(
            "Arena resized to {:.1}x{:.1} (scale {})",
            self.arena.width(),
            self.arena.height(),
            scale
        );
        Ok(())
    }

    /// Follow the layout's core rectangle at the configured scale
    pub fn apply_layout(&mut self, layout: &ReactorLayout) -> Result<()> {
        self.set_arena(layout.core_rect(), self.settings.coord_scale)
    }

    /// Simulation space to display space
    #[inline]
    pub fn to_display_coords(&self, pos: DVec2) -> DVec2 {
        self.arena.to_display(pos)
    }

    /// All molecules, in insertion order
    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    /// Render views, in insertion order
    pub fn particles(&self) -> impl Iterator<Item = MoleculeView> + '_ {
        self.molecules.iter().map(MoleculeView::from)
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }

    /// Number of molecules of one shape
    pub fn count(&self, shape: Shape) -> usize {
        self.molecules.iter().filter(|m| m.shape() == shape).count()
    }

    pub fn total_mass(&self) -> u64 {
        self.molecules.iter().map(|m| u64::from(m.mass())).sum()
    }

    /// Total kinetic energy (diagnostic; reactions don't conserve it)
    pub fn kinetic_energy(&self) -> f64 {
        self.molecules.iter().map(Molecule::kinetic_energy).sum()
    }

    /// Add a caller-built molecule, keeping its state. Returns its id.
    pub fn insert(&mut self, mut molecule: Molecule) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        molecule.set_id(id);
        self.molecules.push(molecule);
        id
    }

    /// Spawn a unit circle at a random spot, heading in a random direction
    pub fn spawn_circle(&mut self) -> Result<u32> {
        self.spawn(Shape::Circle)
    }

    /// Spawn a unit square at a random spot, heading in a random direction
    pub fn spawn_square(&mut self) -> Result<u32> {
        self.spawn(Shape::Square)
    }

    fn spawn(&mut self, shape: Shape) -> Result<u32> {
        let radius = shape.collision_radius(shape.size_for_mass(1));
        let (min, max) = (self.arena.min(), self.arena.max());

        let mut axis = |lo: f64, hi: f64| {
            if hi - lo > 2.0 * radius {
                self.rng.random_range(lo + radius..=hi - radius)
            } else {
                (lo + hi) * 0.5
            }
        };
        let pos = DVec2::new(axis(min.x, max.x), axis(min.y, max.y));

        let theta = self.rng.random_range(0.0..TAU);
        let speed = self
            .rng
            .random_range(self.settings.spawn_speed_min..=self.settings.spawn_speed_max);

        let color = match shape {
            Shape::Circle => self.settings.circle_color,
            Shape::Square => self.settings.square_color,
        };
        let molecule = Molecule::new(shape, pos, polar_to_cartesian(speed, theta), 1, color)?;
        let id = self.insert(molecule);
        log::debug!("Spawned {} #{} at ({:.2}, {:.2})", shape.as_str(), id, pos.x, pos.y);
        Ok(id)
    }

    /// Run the simulation forward by `dt` seconds.
    ///
    /// `advance(0.0)` is a strict no-op. Errors: `InvalidTimeStep` for a
    /// negative or non-finite `dt`; `MissingReaction` if two touching shapes
    /// have no rule.
    pub fn advance(&mut self, dt: f64) -> Result<TickStats> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(ReactorError::InvalidTimeStep(dt));
        }
        let mut stats = TickStats::default();
        if dt == 0.0 {
            return Ok(stats);
        }

        let cap = self.settings.max_events_per_tick;
        let mut remaining = dt;
        let mut resolved = 0;

        while remaining > 0.0 {
            if resolved >= cap {
                log::warn!(
                    "Event cap ({}) reached at t={:.4}; drifting the last {:.6}s",
                    cap,
                    self.time,
                    remaining
                );
                stats.capped = true;
                self.drift_all(remaining, &mut stats);
                break;
            }

            match self.next_event() {
                Some(event) if event.within(remaining) => {
                    let step = event.delta.min(remaining);
                    self.drift_all(step, &mut stats);
                    remaining -= step;
                    self.resolve(event, &mut stats)?;
                    resolved += 1;
                }
                _ => {
                    self.drift_all(remaining, &mut stats);
                    break;
                }
            }
        }

        self.time += dt;
        self.sweep();
        Ok(stats)
    }

    /// Earliest upcoming event among live molecules
    fn next_event(&self) -> Option<Event> {
        let mut best = Earliest::default();

        for (i, a) in self.molecules.iter().enumerate() {
            if !a.is_alive() {
                continue;
            }
            for (j, b) in self.molecules.iter().enumerate().skip(i + 1) {
                if !b.is_alive() {
                    continue;
                }
                if let Some(t) = contact_time(a, b) {
                    best.offer(Event::pair(t, i, j, (a.id(), b.id())));
                }
            }
        }

        for (i, m) in self.molecules.iter().enumerate() {
            if !m.is_alive() {
                continue;
            }
            for wall in self.arena.walls() {
                if let Some(t) = wall.time_to_contact(m.position(), m.velocity(), m.collision_radius()) {
                    best.offer(Event::wall(t, i, m.id(), wall.side));
                }
            }
        }

        best.into_inner()
    }

    fn drift_all(&mut self, dt: f64, stats: &mut TickStats) {
        stats.substeps.push(dt);
        if dt <= 0.0 {
            return;
        }
        for m in &mut self.molecules {
            m.drift(dt);
        }
    }

    fn resolve(&mut self, event: Event, stats: &mut TickStats) -> Result<()> {
        match event.kind {
            EventKind::Wall { i, side } => {
                let wall = *self.arena.wall(side);
                let m = &mut self.molecules[i];
                m.set_velocity(wall.bounce(m.velocity()));
                m.set_position(wall.snap(m.position(), m.collision_radius()));
                stats.wall_bounces += 1;
                log::debug!("#{} bounced off {:?} wall", m.id(), side);
                Ok(())
            }
            EventKind::Pair { i, j } => {
                self.react(i, j)?;
                stats.reactions += 1;
                Ok(())
            }
        }
    }

    /// Replace two touching molecules with their reaction products
    fn react(&mut self, i: usize, j: usize) -> Result<()> {
        let (a, b) = (&self.molecules[i], &self.molecules[j]);
        let Some(rule) = self.reactions.lookup(a.shape(), b.shape()) else {
            debug_assert!(false, "no reaction rule for {:?} + {:?}", a.shape(), b.shape());
            log::error!("No reaction rule for {:?} + {:?}", a.shape(), b.shape());
            return Err(ReactorError::MissingReaction {
                a: a.shape(),
                b: b.shape(),
            });
        };

        let products = rule(a, b, &self.params)?;
        log::debug!(
            "{} #{} + {} #{} -> {} products",
            a.shape().as_str(),
            a.id(),
            b.shape().as_str(),
            b.id(),
            products.len()
        );

        self.molecules[i].set_state(PhysicalState::Dead);
        self.molecules[j].set_state(PhysicalState::Dead);

        for mut product in products {
            let radius = product.collision_radius();
            if !self.arena.contains(product.position(), radius) {
                product.set_position(self.arena.clamp_inside(product.position(), radius));
            }
            self.insert(product);
        }
        Ok(())
    }

    /// End-of-tick cleanup: drop the dead, wake the newborn
    fn sweep(&mut self) {
        self.molecules.retain(|m| m.state() != PhysicalState::Dead);
        for m in &mut self.molecules {
            if m.state() == PhysicalState::Unresponsive {
                m.set_state(PhysicalState::Alive);
            }
        }
    }
}
