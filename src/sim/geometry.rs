//! Geometry primitives for collision prediction
//!
//! Rays and lines share one representation (point + direction). A ray only
//! looks forward from its origin; a line extends both ways. Every query here is
//! total: degenerate input yields `None`, never an error or a NaN.

use glam::DVec2;

/// Point + direction. Used for moving molecules (ray) and arena walls (line).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec2,
    pub dir: DVec2,
}

impl Ray {
    pub const fn new(origin: DVec2, dir: DVec2) -> Self {
        Self { origin, dir }
    }

    /// Point at parameter `t`
    #[inline]
    pub fn at(&self, t: f64) -> DVec2 {
        self.origin + self.dir * t
    }
}

/// Walls are infinite lines for intersection purposes
pub type Line = Ray;

/// Signed ray parameter where `ray` crosses `line`.
///
/// Returns `None` when the two are parallel (or either direction is zero).
/// Negative values mean the crossing lies behind the ray origin.
pub fn intersect_param(ray: &Ray, line: &Line) -> Option<f64> {
    let denom = ray.dir.perp_dot(line.dir);
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    let t = (line.origin - ray.origin).perp_dot(line.dir) / denom;
    t.is_finite().then_some(t)
}

/// Intersection point of a ray with a line, if it lies ahead of the ray origin
pub fn intersect(ray: &Ray, line: &Line) -> Option<DVec2> {
    intersect_param(ray, line)
        .filter(|&t| t >= 0.0)
        .map(|t| ray.at(t))
}

/// Real roots of `a t² + b t + c = 0`, ascending
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Roots {
    None,
    /// Double root (or the single root of the linear case)
    One(f64),
    Two(f64, f64),
}

impl Roots {
    /// Number of distinct real roots
    pub fn count(&self) -> usize {
        match self {
            Roots::None => 0,
            Roots::One(_) => 1,
            Roots::Two(..) => 2,
        }
    }

    /// Smallest real root, if any
    pub fn smallest(&self) -> Option<f64> {
        match *self {
            Roots::None => None,
            Roots::One(t) => Some(t),
            Roots::Two(t, _) => Some(t),
        }
    }
}

/// Solve a quadratic with the cancellation-free form of the formula.
///
/// `a == 0` falls back to the linear equation; an all-zero equation has no
/// isolated roots and reports `Roots::None`.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Roots {
    if !(a.is_finite() && b.is_finite() && c.is_finite()) {
        return Roots::None;
    }
    if a == 0.0 {
        if b == 0.0 {
            return Roots::None;
        }
        return Roots::One(-c / b);
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Roots::None;
    }
    if disc == 0.0 {
        return Roots::One(-b / (2.0 * a));
    }

    let q = -0.5 * (b + b.signum() * disc.sqrt());
    // b == 0 gives q == 0 only when c == 0 too, i.e. roots 0 and 0
    if q == 0.0 {
        return Roots::One(0.0);
    }
    let r1 = q / a;
    let r2 = c / q;
    if r1 <= r2 {
        Roots::Two(r1, r2)
    } else {
        Roots::Two(r2, r1)
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n, `normal` must be unit length
#[inline]
pub fn reflect(vel: DVec2, normal: DVec2) -> DVec2 {
    vel - 2.0 * vel.dot(normal) * normal
}
