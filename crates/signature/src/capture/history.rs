//! Clear, undo and full redraw

use tracing::{debug, info};

use crate::error::SignatureError;
use crate::raster;
use crate::types::{Stroke, parse_color};

use super::SignatureCapture;

impl SignatureCapture {
    /// Erase everything: strokes, the in-progress stroke and any imported
    /// image. Pending imports are superseded.
    pub fn clear(&mut self) {
        let Some(mounted) = self.mounted.as_mut() else {
            return;
        };
        mounted.surface.fill(self.background);

        self.strokes.clear();
        self.current = None;
        self.backdrop = None;
        self.import_generation += 1;
        self.has_signature = false;

        debug!("Signature cleared");
        self.emit_change();
    }

    /// Remove the most recently committed stroke and redraw.
    /// Returns false (and changes nothing) when there is no stroke to undo.
    pub fn undo(&mut self) -> bool {
        if self.mounted.is_none() {
            return false;
        }
        let Some(removed) = self.strokes.pop() else {
            debug!("undo: no strokes");
            return false;
        };

        self.redraw();
        self.has_signature = !self.strokes.is_empty() || self.backdrop.is_some();

        debug!(
            "undo: removed stroke with {} point(s), {} remaining",
            removed.len(),
            self.strokes.len()
        );
        self.emit_change();
        true
    }

    /// Repaint the surface from history: background, imported image,
    /// committed strokes, then the stroke in progress
    pub fn redraw(&mut self) {
        let pen = self.pen();
        let Some(mounted) = self.mounted.as_mut() else {
            return;
        };
        let surface = &mut mounted.surface;

        surface.fill(self.background);
        if let Some(backdrop) = &self.backdrop {
            surface.draw_image(backdrop, 0, 0);
        }
        for stroke in self.strokes.iter().chain(self.current.iter()) {
            raster::draw_stroke(surface, stroke, &pen);
        }
    }

    /// Replace the stroke history wholesale, as when restoring a saved
    /// vector signature. Empty strokes are dropped.
    pub fn load_strokes(&mut self, strokes: Vec<Stroke>) {
        if self.mounted.is_none() {
            return;
        }
        self.strokes = strokes.into_iter().filter(|s| !s.is_empty()).collect();
        self.current = None;
        self.backdrop = None;
        self.import_generation += 1;
        self.redraw();
        self.has_signature = !self.strokes.is_empty();

        info!("Loaded {} stroke(s)", self.strokes.len());
        self.emit_change();
    }

    /// Set the pen color for subsequent drawing
    pub fn set_pen_color(&mut self, color: &str) -> Result<(), SignatureError> {
        self.pen_color = parse_color(color)?;
        Ok(())
    }

    /// Set the pen width in CSS pixels; non-positive widths are ignored
    pub fn set_pen_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.pen_width = width;
        }
    }

    /// Change the background and repaint, keeping the signature
    pub fn set_background_color(&mut self, color: &str) -> Result<(), SignatureError> {
        self.background = parse_color(color)?;
        self.redraw();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ecoreport_ipc::PointerInput;

    use super::super::tests::{WHITE, capture, draw, line};
    use crate::types::Point;

    #[test]
    fn test_clear_empties_everything() {
        let mut capture = capture(40.0, 40.0);
        draw(&mut capture, &line(8));
        capture.start_stroke(&PointerInput::mouse(3.0, 30.0));

        capture.clear();

        assert!(capture.is_empty());
        assert!(!capture.is_drawing());
        assert_eq!(capture.stroke_count(), 0);
        let surface = capture.surface().unwrap();
        assert!(surface.pixels().iter().all(|p| *p == WHITE));
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut capture = capture(40.0, 40.0);
        let before = capture.surface().unwrap().pixels().to_vec();

        assert!(!capture.undo());
        assert!(capture.is_empty());
        assert_eq!(capture.surface().unwrap().pixels(), before.as_slice());
    }

    #[test]
    fn test_undo_matches_fresh_drawing() {
        let first = [(4.0, 4.0), (30.0, 12.0), (8.0, 35.0)];
        let second = [(2.0, 20.0), (38.0, 22.0)];

        let mut undone = capture(40.0, 40.0);
        draw(&mut undone, &first);
        draw(&mut undone, &second);
        assert!(undone.undo());

        let mut fresh = capture(40.0, 40.0);
        draw(&mut fresh, &first);

        assert_eq!(undone.stroke_count(), 1);
        assert!(!undone.is_empty());
        assert_eq!(
            undone.surface().unwrap().pixels(),
            fresh.surface().unwrap().pixels()
        );
    }

    #[test]
    fn test_undo_keeps_in_progress_stroke() {
        let mut capture = capture(40.0, 40.0);
        draw(&mut capture, &[(2.0, 2.0), (10.0, 2.0)]);
        capture.start_stroke(&PointerInput::mouse(20.0, 30.0));
        capture.extend_stroke(&PointerInput::mouse(35.0, 30.0));

        capture.undo();
        assert!(capture.is_drawing());
        capture.end_stroke();

        assert_eq!(capture.stroke_count(), 1);
        assert_eq!(capture.strokes()[0].points()[0], Point::new(20.0, 30.0));
    }

    #[test]
    fn test_load_strokes_replaces_history() {
        let mut capture = capture(40.0, 40.0);
        draw(&mut capture, &line(4));

        capture.load_strokes(vec![
            crate::types::Stroke::from_points(vec![Point::new(1.0, 1.0), Point::new(9.0, 9.0)]),
            crate::types::Stroke::default(),
        ]);
        assert_eq!(capture.stroke_count(), 1);
        assert!(!capture.is_empty());

        capture.load_strokes(Vec::new());
        assert!(capture.is_empty());
    }

    #[test]
    fn test_background_change_keeps_signature() {
        let mut capture = capture(20.0, 20.0);
        draw(&mut capture, &[(2.0, 10.0), (18.0, 10.0)]);

        capture.set_background_color("#ff0000").unwrap();

        let surface = capture.surface().unwrap();
        assert_eq!(surface.get_pixel(0, 0), Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(surface.get_pixel(10, 10), Some([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(capture.stroke_count(), 1);
    }

    #[test]
    fn test_pen_setters() {
        let mut capture = capture(20.0, 20.0);
        assert!(capture.set_pen_color("nonsense").is_err());
        capture.set_pen_color("rgb(0, 0, 255)").unwrap();
        capture.set_pen_width(-3.0);
        capture.set_pen_width(4.0);

        draw(&mut capture, &[(10.0, 10.0)]);
        let surface = capture.surface().unwrap();
        assert_eq!(surface.get_pixel(8, 10), Some([0.0, 0.0, 1.0, 1.0]));
    }
}
