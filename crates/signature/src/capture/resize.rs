use tracing::info;

use super::{Mounted, SignatureCapture};

impl SignatureCapture {
    /// Re-size the raster buffer to the host's current on-screen size and
    /// repaint from history. Strokes keep their buffer coordinates.
    pub fn handle_resize(&mut self) {
        let Some(mounted) = self.mounted.take() else {
            return;
        };
        let old = (mounted.surface.width, mounted.surface.height);
        let resized = Mounted::sized(mounted.host);
        info!(
            "Signature surface resized: {}x{} -> {}x{}",
            old.0, old.1, resized.surface.width, resized.surface.height
        );
        self.mounted = Some(resized);
        self.redraw();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use ecoreport_config::SignatureConfig;
    use ecoreport_ipc::{ClientRect, PointerInput};

    use super::super::tests::{WHITE, draw};
    use super::*;
    use crate::host::SurfaceHost;

    struct ResizableHost {
        width: Cell<f32>,
        height: Cell<f32>,
    }

    impl SurfaceHost for ResizableHost {
        fn client_rect(&self) -> ClientRect {
            ClientRect::new(0.0, 0.0, self.width.get(), self.height.get())
        }

        fn device_pixel_ratio(&self) -> f32 {
            1.0
        }
    }

    fn resizable(width: f32, height: f32) -> (Rc<ResizableHost>, SignatureCapture) {
        let host = Rc::new(ResizableHost {
            width: Cell::new(width),
            height: Cell::new(height),
        });
        let capture =
            SignatureCapture::mounted(Rc::clone(&host), &SignatureConfig::default()).unwrap();
        (host, capture)
    }

    #[test]
    fn test_resize_rebuilds_surface_and_keeps_history() {
        let (host, mut capture) = resizable(40.0, 40.0);
        draw(&mut capture, &[(2.0, 5.0), (30.0, 5.0)]);
        draw(&mut capture, &[(2.0, 20.0), (30.0, 20.0)]);

        host.width.set(80.0);
        host.height.set(60.0);
        capture.handle_resize();

        assert_eq!((capture.width(), capture.height()), (80, 60));
        assert_eq!(capture.stroke_count(), 2);
        assert_ne!(capture.surface().unwrap().get_pixel(10, 5), Some(WHITE));

        assert!(capture.undo());
        assert_eq!(capture.stroke_count(), 1);
        let surface = capture.surface().unwrap();
        assert_ne!(surface.get_pixel(10, 5), Some(WHITE));
        assert_eq!(surface.get_pixel(10, 20), Some(WHITE));
    }

    #[test]
    fn test_resize_mid_stroke_keeps_committed_history() {
        let (host, mut capture) = resizable(40.0, 40.0);
        draw(&mut capture, &[(2.0, 5.0), (30.0, 5.0)]);

        capture.start_stroke(&PointerInput::mouse(2.0, 20.0));
        capture.extend_stroke(&PointerInput::mouse(10.0, 20.0));
        host.width.set(80.0);
        capture.handle_resize();
        assert!(capture.is_drawing());
        capture.extend_stroke(&PointerInput::mouse(60.0, 20.0));
        capture.end_stroke();

        let lens: Vec<usize> = capture.strokes().iter().map(|s| s.len()).collect();
        assert_eq!(lens, vec![2, 3]);
        assert_ne!(capture.surface().unwrap().get_pixel(50, 20), Some(WHITE));

        assert!(capture.undo());
        assert_eq!(capture.stroke_count(), 1);
        assert_eq!(capture.surface().unwrap().get_pixel(50, 20), Some(WHITE));
    }

    #[test]
    fn test_shrink_clips_without_losing_strokes() {
        let (host, mut capture) = resizable(60.0, 60.0);
        draw(&mut capture, &[(50.0, 50.0), (55.0, 55.0)]);

        host.width.set(20.0);
        host.height.set(20.0);
        capture.handle_resize();
        assert!(capture.surface().unwrap().pixels().iter().all(|p| *p == WHITE));

        host.width.set(60.0);
        host.height.set(60.0);
        capture.handle_resize();
        assert_ne!(capture.surface().unwrap().get_pixel(52, 52), Some(WHITE));
        assert!(!capture.is_empty());
    }
}
