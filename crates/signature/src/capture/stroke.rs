//! Pointer handling for the capture component

use ecoreport_ipc::PointerInput;
use tracing::debug;

use crate::raster;
use crate::types::{Point, Stroke};

use super::SignatureCapture;

impl SignatureCapture {
    /// Convert an event's client position to buffer coordinates:
    /// `(client - origin) * (buffer size / display size)`.
    /// Mouse and touch share this path so both draw identically.
    pub fn normalize(&self, event: &PointerInput) -> Option<Point> {
        let mounted = self.mounted.as_ref()?;
        let (client_x, client_y) = event.client_position()?;
        let rect = mounted.host.client_rect();
        let ratio = mounted.metrics.device_pixel_ratio;

        let scale_x = if rect.width > 0.0 {
            mounted.surface.width as f32 / rect.width
        } else {
            ratio
        };
        let scale_y = if rect.height > 0.0 {
            mounted.surface.height as f32 / rect.height
        } else {
            ratio
        };

        Some(Point::new(
            (client_x - rect.left) * scale_x,
            (client_y - rect.top) * scale_y,
        ))
    }

    /// Begin a stroke at the event position.
    ///
    /// If a stroke is already in progress it is abandoned and the surface is
    /// redrawn without it.
    pub fn start_stroke(&mut self, event: &PointerInput) {
        let Some(point) = self.normalize(event) else {
            debug!("start_stroke: no position or surface, ignoring");
            return;
        };

        if let Some(abandoned) = self.current.take() {
            debug!("start_stroke: restarting, dropping {} point(s)", abandoned.len());
            self.redraw();
        }

        let pen = self.pen();
        if let Some(mounted) = self.mounted.as_mut() {
            raster::draw_dot(&mut mounted.surface, point, &pen);
        }
        self.current = Some(Stroke::starting_at(point));
    }

    /// Append the event position to the stroke in progress and draw the
    /// segment from the previous point
    pub fn extend_stroke(&mut self, event: &PointerInput) {
        if self.current.is_none() {
            return;
        }
        let Some(point) = self.normalize(event) else {
            return;
        };

        let pen = self.pen();
        let Some(stroke) = self.current.as_mut() else {
            return;
        };
        let previous = stroke.last().unwrap_or(point);
        stroke.push(point);

        if let Some(mounted) = self.mounted.as_mut() {
            raster::draw_segment(&mut mounted.surface, previous, point, &pen);
        }
        self.has_signature = true;
    }

    /// Commit the stroke in progress, even if it is a single tap
    pub fn end_stroke(&mut self) {
        let Some(stroke) = self.current.take() else {
            return;
        };

        debug!(
            "Committed stroke {} with {} point(s)",
            self.strokes.len(),
            stroke.len()
        );
        self.strokes.push(stroke);
        self.has_signature = true;
        self.emit_change();
    }
}

#[cfg(test)]
mod tests {
    use ecoreport_config::SignatureConfig;
    use ecoreport_ipc::PointerInput;

    use super::super::tests::{WHITE, capture, draw};
    use super::*;
    use crate::host::FixedHost;

    #[test]
    fn test_normalize_with_offset_and_ratio() {
        let host = FixedHost::new(100.0, 50.0)
            .with_offset(20.0, 10.0)
            .with_pixel_ratio(2.0);
        let capture = SignatureCapture::mounted(host, &SignatureConfig::default()).unwrap();

        let point = capture.normalize(&PointerInput::mouse(70.0, 35.0)).unwrap();
        assert_eq!(point, Point::new(100.0, 50.0));
    }

    #[test]
    fn test_mouse_and_touch_normalize_identically() {
        let capture = capture(80.0, 80.0);
        assert_eq!(
            capture.normalize(&PointerInput::mouse(12.5, 40.0)),
            capture.normalize(&PointerInput::touch(12.5, 40.0))
        );
    }

    #[test]
    fn test_commit_increments_count() {
        let mut capture = capture(100.0, 100.0);
        for n in 1..=3 {
            draw(&mut capture, &[(10.0, 10.0 * n as f32), (40.0, 10.0 * n as f32)]);
            assert_eq!(capture.stroke_count(), n);
            assert!(!capture.is_empty());
        }
    }

    #[test]
    fn test_tap_is_committed_as_single_point() {
        let mut capture = capture(30.0, 30.0);
        capture.start_stroke(&PointerInput::mouse(15.0, 15.0));
        capture.end_stroke();

        assert_eq!(capture.stroke_count(), 1);
        assert_eq!(capture.strokes()[0].len(), 1);
        assert!(!capture.is_empty());
        assert_ne!(capture.surface().unwrap().get_pixel(15, 15), Some(WHITE));
    }

    #[test]
    fn test_extend_without_start_is_noop() {
        let mut capture = capture(30.0, 30.0);
        capture.extend_stroke(&PointerInput::mouse(5.0, 5.0));
        capture.end_stroke();
        assert!(capture.is_empty());
        assert_eq!(capture.stroke_count(), 0);
    }

    #[test]
    fn test_touch_end_without_contacts() {
        let mut capture = capture(30.0, 30.0);
        capture.start_stroke(&PointerInput::touch(5.0, 5.0));
        capture.extend_stroke(&PointerInput::Touch { touches: vec![] });
        capture.end_stroke();
        assert_eq!(capture.strokes()[0].len(), 1);
    }

    #[test]
    fn test_restart_drops_in_progress_stroke() {
        let mut capture = capture(60.0, 60.0);
        capture.start_stroke(&PointerInput::mouse(5.0, 5.0));
        capture.extend_stroke(&PointerInput::mouse(50.0, 5.0));
        capture.start_stroke(&PointerInput::mouse(30.0, 40.0));
        capture.end_stroke();

        assert_eq!(capture.stroke_count(), 1);
        assert_eq!(capture.strokes()[0].points(), &[Point::new(30.0, 40.0)]);
        // Pixels of the abandoned segment are gone
        assert_eq!(capture.surface().unwrap().get_pixel(25, 4), Some(WHITE));
    }

    #[test]
    fn test_incremental_drawing_matches_full_redraw() {
        let mut capture = capture(64.0, 64.0);
        draw(&mut capture, &[(3.0, 3.0), (60.0, 9.0), (30.0, 55.0)]);
        draw(&mut capture, &[(10.0, 40.0), (50.0, 40.0)]);
        let incremental = capture.surface().unwrap().pixels().to_vec();

        capture.redraw();
        assert_eq!(capture.surface().unwrap().pixels(), incremental.as_slice());
    }
}
