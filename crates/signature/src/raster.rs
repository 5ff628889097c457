//! Pen rasterization
//!
//! A pen segment is painted as a capsule: every pixel whose center lies
//! within `radius` of the segment receives the ink color. Coverage is
//! binary and the ink color is fixed per stroke, so painting a pixel twice
//! is the same as painting it once. Incremental drawing and a full redraw
//! from stroke history therefore produce identical rasters.

use tracing::trace;

use crate::constants::MIN_PEN_RADIUS;
use crate::surface::CpuSurface;
use crate::types::{Point, Stroke};

/// Pen parameters in buffer pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    /// Opaque ink color written to covered pixels
    pub ink: [f32; 4],
    /// Half the line width
    pub radius: f32,
}

impl Pen {
    /// Build a pen from its color, its width in buffer pixels, and the
    /// background it is drawn over. Translucent pens are resolved against
    /// the background once so that overlapping segments do not darken.
    pub fn new(color: [f32; 4], width: f32, background: [f32; 4]) -> Self {
        Self {
            ink: crate::surface::source_over(color, background),
            radius: (width / 2.0).max(MIN_PEN_RADIUS),
        }
    }
}

/// Paint the capsule from `a` to `b`.
/// Returns the affected bounding box (x, y, width, height), or None if the
/// capsule misses the surface.
pub fn draw_segment(
    surface: &mut CpuSurface,
    a: Point,
    b: Point,
    pen: &Pen,
) -> Option<(u32, u32, u32, u32)> {
    let r = pen.radius;
    let x_min_f = (a.x.min(b.x) - r).floor().max(0.0);
    let y_min_f = (a.y.min(b.y) - r).floor().max(0.0);
    let x_max_f = (a.x.max(b.x) + r).ceil();
    let y_max_f = (a.y.max(b.y) + r).ceil();

    if x_max_f <= 0.0 || y_max_f <= 0.0 {
        return None;
    }

    let x_min = (x_min_f as u32).min(surface.width);
    let y_min = (y_min_f as u32).min(surface.height);
    let x_max = (x_max_f as u32).min(surface.width);
    let y_max = (y_max_f as u32).min(surface.height);

    if x_min >= x_max || y_min >= y_max {
        return None;
    }

    let r_sq = r * r;
    for py in y_min..y_max {
        for px in x_min..x_max {
            let p = Point::new(px as f32 + 0.5, py as f32 + 0.5);
            if distance_sq_to_segment(p, a, b) <= r_sq {
                surface.set_pixel(px, py, pen.ink);
            }
        }
    }

    let (w, h) = (x_max - x_min, y_max - y_min);
    surface.mark_region_dirty(x_min, y_min, w, h);
    trace!(
        "draw_segment: ({:.1}, {:.1}) -> ({:.1}, {:.1}), region {}x{}",
        a.x, a.y, b.x, b.y, w, h
    );
    Some((x_min, y_min, w, h))
}

/// Paint a round dot (a zero-length segment)
pub fn draw_dot(surface: &mut CpuSurface, p: Point, pen: &Pen) -> Option<(u32, u32, u32, u32)> {
    draw_segment(surface, p, p, pen)
}

/// Paint a whole stroke: a dot at its first point, then each segment
pub fn draw_stroke(surface: &mut CpuSurface, stroke: &Stroke, pen: &Pen) {
    let points = stroke.points();
    let Some(&first) = points.first() else {
        return;
    };
    draw_dot(surface, first, pen);
    for pair in points.windows(2) {
        draw_segment(surface, pair[0], pair[1], pen);
    }
}

fn distance_sq_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let (apx, apy) = (p.x - a.x, p.y - a.y);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq > 0.0 {
        ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (dx, dy) = (apx - t * abx, apy - t * aby);
    dx * dx + dy * dy
}
