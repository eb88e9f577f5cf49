//! Read-only render snapshot
//!
//! The host paints after each tick from these records; it never sees a
//! mutable molecule. `MoleculeInstance` is laid out for direct upload into a
//! GPU instance buffer.

use bytemuck::{Pod, Zeroable};
use glam::DVec2;

use crate::settings::Rgb;
use crate::sim::{Molecule, ReactorCore, Shape};

/// What a renderer needs to know about one molecule (simulation units)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoleculeView {
    pub id: u32,
    pub shape: Shape,
    /// Radius for circles, side length for squares
    pub size: f64,
    pub color: Rgb,
    pub position: DVec2,
}

impl From<&Molecule> for MoleculeView {
    fn from(m: &Molecule) -> Self {
        Self {
            id: m.id(),
            shape: m.shape(),
            size: m.size(),
            color: m.color(),
            position: m.position(),
        }
    }
}

/// Shape codes shared with the shader
pub mod shape_code {
    pub const CIRCLE: u32 = 0;
    pub const SQUARE: u32 = 1;
}

/// One molecule in display space
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MoleculeInstance {
    pub center: [f32; 2],
    /// Radius (circle) or side length (square) in display units
    pub size: f32,
    pub shape: u32,
    pub color: [f32; 4],
}

impl MoleculeInstance {
    pub fn new(view: &MoleculeView, core: &ReactorCore) -> Self {
        let center = core.to_display_coords(view.position);
        Self {
            center: [center.x as f32, center.y as f32],
            size: (view.size * core.arena().scale()) as f32,
            shape: match view.shape {
                Shape::Circle => shape_code::CIRCLE,
                Shape::Square => shape_code::SQUARE,
            },
            color: view.color.to_rgba_f32(),
        }
    }
}

/// Snapshot of every molecule, ready for upload
pub fn build_instances(core: &ReactorCore) -> Vec<MoleculeInstance> {
    core.particles()
        .map(|view| MoleculeInstance::new(&view, core))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Rect;
    use crate::settings::ReactorSettings;

    #[test]
    fn test_instances_in_display_space() {
        let mut core =
            ReactorCore::new(Rect::new(80.0, 0.0, 720.0, 600.0), 10.0, ReactorSettings::seeded(1))
                .unwrap();
        core.insert(Molecule::circle(DVec2::new(10.0, 3.0), DVec2::ZERO, 1).unwrap());
        core.insert(Molecule::square(DVec2::new(18.0, 10.0), DVec2::ZERO, 4).unwrap());

        let instances = build_instances(&core);
        assert_eq!(instances.len(), 2);

        assert_eq!(instances[0].center, [100.0, 30.0]);
        assert_eq!(instances[0].size, 10.0);
        assert_eq!(instances[0].shape, shape_code::CIRCLE);
        assert_eq!(instances[0].color, [1.0, 0.0, 0.0, 1.0]);

        assert_eq!(instances[1].center, [180.0, 100.0]);
        // side 2 * sqrt(4) = 4 sim units
        assert_eq!(instances[1].size, 40.0);
        assert_eq!(instances[1].shape, shape_code::SQUARE);
    }

    #[test]
    fn test_instance_is_plain_bytes() {
        let instance = MoleculeInstance::zeroed();
        let bytes: &[u8] = bytemuck::bytes_of(&instance);
        assert_eq!(bytes.len(), std::mem::size_of::<MoleculeInstance>());
        assert_eq!(bytes.len(), 32);
    }

    #[test]
    fn test_views_follow_insertion_order() {
        let mut core =
            ReactorCore::new(Rect::new(0.0, 0.0, 50.0, 50.0), 1.0, ReactorSettings::seeded(9))
                .unwrap();
        let a = core.spawn_square().unwrap();
        let b = core.spawn_circle().unwrap();
        let ids: Vec<u32> = core.particles().map(|v| v.id).collect();
        assert_eq!(ids, vec![a, b]);
    }
}
