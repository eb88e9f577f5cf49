//! Host canvas layout
//!
//! The canvas is split horizontally: a piston strip on the left whose width is
//! a slider-controlled share of the canvas, and the reactor core filling the
//! rest. Pushing the piston in shrinks the core, and with it the arena.

use serde::{Deserialize, Serialize};

use crate::error::{ReactorError, Result};
use crate::settings::ReactorSettings;

/// Axis-aligned rectangle in display space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Piston/core split of the host canvas
#[derive(Debug, Clone, PartialEq)]
pub struct ReactorLayout {
    canvas_width: f64,
    canvas_height: f64,
    piston_percent: u32,
    min_percent: u32,
    max_percent: u32,
}

impl ReactorLayout {
    /// Errors: `InvalidArena` for a non-positive canvas.
    pub fn new(canvas_width: f64, canvas_height: f64, settings: &ReactorSettings) -> Result<Self> {
        check_canvas(canvas_width, canvas_height)?;
        let mut layout = Self {
            canvas_width,
            canvas_height,
            piston_percent: settings.piston_min_percent,
            min_percent: settings.piston_min_percent,
            max_percent: settings.piston_max_percent,
        };
        layout.set_piston_percent(settings.piston_percent);
        Ok(layout)
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) -> Result<()> {
        check_canvas(width, height)?;
        self.canvas_width = width;
        self.canvas_height = height;
        Ok(())
    }

    /// Move the piston. Values are clamped to the slider range.
    /// Returns false if the piston didn't move.
    pub fn set_piston_percent(&mut self, percent: u32) -> bool {
        let percent = percent.clamp(self.min_percent, self.max_percent);
        if percent == self.piston_percent {
            return false;
        }
        self.piston_percent = percent;
        true
    }

    #[inline]
    pub fn piston_percent(&self) -> u32 {
        self.piston_percent
    }

    pub fn piston_range(&self) -> (u32, u32) {
        (self.min_percent, self.max_percent)
    }

    fn piston_width(&self) -> f64 {
        self.canvas_width * f64::from(self.piston_percent) / 100.0
    }

    pub fn piston_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.piston_width(), self.canvas_height)
    }

    /// Reactor core rectangle; this is the arena in display space
    pub fn core_rect(&self) -> Rect {
        let piston = self.piston_width();
        Rect::new(piston, 0.0, self.canvas_width - piston, self.canvas_height)
    }
}

fn check_canvas(width: f64, height: f64) -> Result<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(ReactorError::InvalidArena {
            width,
            height,
            scale: 1.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ReactorLayout {
        ReactorLayout::new(800.0, 600.0, &ReactorSettings::default()).unwrap()
    }

    #[test]
    fn test_initial_split() {
        let layout = layout();
        assert_eq!(layout.piston_percent(), 10);
        assert_eq!(layout.piston_rect(), Rect::new(0.0, 0.0, 80.0, 600.0));
        assert_eq!(layout.core_rect(), Rect::new(80.0, 0.0, 720.0, 600.0));
    }

    #[test]
    fn test_piston_clamped_to_slider_range() {
        let mut layout = layout();
        assert!(layout.set_piston_percent(95));
        assert_eq!(layout.piston_percent(), 80);
        assert!(!layout.set_piston_percent(80));
        assert!(layout.set_piston_percent(0));
        assert_eq!(layout.piston_percent(), 10);
    }

    #[test]
    fn test_core_and_piston_tile_the_canvas() {
        let mut layout = layout();
        layout.set_piston_percent(37);
        let piston = layout.piston_rect();
        let core = layout.core_rect();
        assert_eq!(piston.right(), core.x);
        assert!((core.right() - 800.0).abs() < 1e-9);
        assert_eq!(core.bottom(), 600.0);
    }

    #[test]
    fn test_resize_canvas() {
        let mut layout = layout();
        layout.set_canvas_size(400.0, 300.0).unwrap();
        assert_eq!(layout.core_rect(), Rect::new(40.0, 0.0, 360.0, 300.0));
        assert!(layout.set_canvas_size(0.0, 300.0).is_err());
    }

    #[test]
    fn test_zero_canvas_rejected() {
        assert!(ReactorLayout::new(0.0, 600.0, &ReactorSettings::default()).is_err());
    }
}
