//! Signature capture component
//!
//! [`SignatureCapture`] connects:
//! - Pointer input (mouse and touch, normalized to buffer coordinates)
//! - Stroke history (committed strokes plus at most one in progress)
//! - The CPU raster surface (incremental drawing, full redraws)
//! - Change notification for the host page
//!
//! The component owns no persistence. Saving is an explicit export; loading
//! is an import whose decode step the host may run asynchronously.

mod history;
mod resize;
mod stroke;
mod transfer;

use ecoreport_config::{SignatureConfig, SurfaceMetrics};
use ecoreport_ipc::SignatureChange;
use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::constants::MAX_SURFACE_SIZE;
use crate::error::SignatureError;
use crate::host::SurfaceHost;
use crate::raster::Pen;
use crate::surface::{CpuSurface, DirtyRegion};
use crate::types::{SignatureInfo, Stroke, parse_color};

pub use transfer::{DecodedImport, ImportOutcome, PendingImport};

/// Handle returned by [`SignatureCapture::on_change`]
pub type ListenerId = u64;

type ChangeListener = Box<dyn Fn(&SignatureChange)>;

/// A drawing surface bound to its host element
pub(crate) struct Mounted {
    pub(crate) host: Box<dyn SurfaceHost>,
    pub(crate) metrics: SurfaceMetrics,
    pub(crate) surface: CpuSurface,
}

impl Mounted {
    /// Size a fresh raster buffer to the host's current on-screen size
    pub(crate) fn sized(host: Box<dyn SurfaceHost>) -> Self {
        let metrics = host.metrics();
        let width = metrics.buffer_width().min(MAX_SURFACE_SIZE);
        let height = metrics.buffer_height().min(MAX_SURFACE_SIZE);
        Self {
            host,
            metrics,
            surface: CpuSurface::new(width, height),
        }
    }
}

/// Freehand signature capture over a raster surface
pub struct SignatureCapture {
    /// None when the host element could not be resolved; every mutating
    /// operation is then a no-op
    pub(crate) mounted: Option<Mounted>,
    pub(crate) pen_color: [f32; 4],
    /// Pen width in CSS pixels
    pub(crate) pen_width: f32,
    pub(crate) background: [f32; 4],
    /// Committed strokes, oldest first
    pub(crate) strokes: Vec<Stroke>,
    /// Stroke being drawn; Some only between pointer-down and pointer-up
    pub(crate) current: Option<Stroke>,
    pub(crate) has_signature: bool,
    /// Raster restored by the last successful import
    pub(crate) backdrop: Option<RgbaImage>,
    /// Bumped by every import and clear; stale import completions are dropped
    pub(crate) import_generation: u64,
    listeners: Vec<(ListenerId, ChangeListener)>,
    next_listener_id: ListenerId,
}

impl std::fmt::Debug for SignatureCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureCapture")
            .field("mounted", &self.is_mounted())
            .field("width", &self.width())
            .field("height", &self.height())
            .field("stroke_count", &self.strokes.len())
            .field("drawing", &self.current.is_some())
            .field("has_signature", &self.has_signature)
            .field("listener_count", &self.listeners.len())
            .finish()
    }
}

impl SignatureCapture {
    /// Create a capture component.
    ///
    /// With `host` set to None the component is inert: it never fails, its
    /// mutations do nothing, and exports report [`SignatureError::NotMounted`].
    /// Invalid colors in `config` are reported as errors.
    pub fn new(
        host: Option<Box<dyn SurfaceHost>>,
        config: &SignatureConfig,
    ) -> Result<Self, SignatureError> {
        let pen_color = parse_color(&config.pen_color)?;
        let background = parse_color(&config.background_color)?;

        let mounted = match host {
            Some(host) => {
                let mut mounted = Mounted::sized(host);
                mounted.surface.fill(background);
                info!(
                    "Signature surface mounted: {}x{} (ratio {})",
                    mounted.surface.width, mounted.surface.height, mounted.metrics.device_pixel_ratio
                );
                Some(mounted)
            }
            None => {
                warn!("No drawing surface available; signature capture is inert");
                None
            }
        };

        Ok(Self {
            mounted,
            pen_color,
            pen_width: config.effective_pen_width(),
            background,
            strokes: Vec::new(),
            current: None,
            has_signature: false,
            backdrop: None,
            import_generation: 0,
            listeners: Vec::new(),
            next_listener_id: 0,
        })
    }

    /// Create a capture component bound to `host`
    pub fn mounted<H: SurfaceHost + 'static>(
        host: H,
        config: &SignatureConfig,
    ) -> Result<Self, SignatureError> {
        Self::new(Some(Box::new(host)), config)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Raster buffer width (0 when not mounted)
    pub fn width(&self) -> u32 {
        self.mounted.as_ref().map_or(0, |m| m.surface.width)
    }

    /// Raster buffer height (0 when not mounted)
    pub fn height(&self) -> u32 {
        self.mounted.as_ref().map_or(0, |m| m.surface.height)
    }

    /// Whether a pointer-down to pointer-up interaction is active
    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_signature
    }

    /// True iff the signature is present, has at least `min_strokes`
    /// committed strokes, and at least `min_points` points across them
    pub fn is_valid(&self, min_strokes: usize, min_points: usize) -> bool {
        !self.is_empty() && self.stroke_count() >= min_strokes && self.total_points() >= min_points
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn total_points(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }

    /// Committed strokes, oldest first
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Summary for the page, validated against the default thresholds
    pub fn info(&self) -> SignatureInfo {
        SignatureInfo {
            is_empty: self.is_empty(),
            is_valid: self.is_valid(
                ecoreport_config::DEFAULT_MIN_STROKES,
                ecoreport_config::DEFAULT_MIN_POINTS,
            ),
            stroke_count: self.stroke_count(),
            total_points: self.total_points(),
            width: self.width(),
            height: self.height(),
        }
    }

    /// The raster surface, if mounted
    pub fn surface(&self) -> Option<&CpuSurface> {
        self.mounted.as_ref().map(|m| &m.surface)
    }

    /// Region changed since the last call, for partial re-upload
    pub fn take_dirty_region(&mut self) -> Option<DirtyRegion> {
        self.mounted.as_mut().and_then(|m| m.surface.take_dirty_region())
    }

    /// Pen in buffer pixels for the current pixel ratio
    pub(crate) fn pen(&self) -> Pen {
        let ratio = self
            .mounted
            .as_ref()
            .map_or(1.0, |m| m.metrics.device_pixel_ratio);
        Pen::new(self.pen_color, self.pen_width * ratio, self.background)
    }

    /// Subscribe to `signaturechange` notifications
    pub fn on_change<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&SignatureChange) + 'static,
    {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Unsubscribe a listener. Returns false if the id was unknown.
    pub fn off_change(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Payload describing the current state
    pub fn change_payload(&self) -> SignatureChange {
        let data_url = if self.has_signature {
            match self.export_data_url() {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!("Failed to encode signature for change notification: {}", e);
                    None
                }
            }
        } else {
            None
        };
        SignatureChange {
            is_empty: self.is_empty(),
            data_url,
        }
    }

    /// Notify listeners of a committed mutation
    pub(crate) fn emit_change(&self) {
        if self.listeners.is_empty() {
            return;
        }
        let change = self.change_payload();
        debug!(
            "signaturechange: is_empty={}, {} listener(s)",
            change.is_empty,
            self.listeners.len()
        );
        for (_, listener) in &self.listeners {
            listener(&change);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use ecoreport_ipc::PointerInput;

    use super::*;
    use crate::host::FixedHost;
    use crate::types::Point;

    pub(crate) const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    pub(crate) fn capture(width: f32, height: f32) -> SignatureCapture {
        SignatureCapture::mounted(FixedHost::new(width, height), &SignatureConfig::default())
            .unwrap()
    }

    pub(crate) fn draw(capture: &mut SignatureCapture, points: &[(f32, f32)]) {
        let (first, rest) = points.split_first().unwrap();
        capture.start_stroke(&PointerInput::mouse(first.0, first.1));
        for &(x, y) in rest {
            capture.extend_stroke(&PointerInput::mouse(x, y));
        }
        capture.end_stroke();
    }

    pub(crate) fn line(n: usize) -> Vec<(f32, f32)> {
        (0..n).map(|i| (5.0 + i as f32 * 3.0, 20.0)).collect()
    }

    #[test]
    fn test_capture_creation() {
        let capture = capture(200.0, 100.0);
        assert!(capture.is_mounted());
        assert_eq!(capture.width(), 200);
        assert_eq!(capture.height(), 100);
        assert!(capture.is_empty());
        assert_eq!(capture.surface().unwrap().get_pixel(0, 0), Some(WHITE));
    }

    #[test]
    fn test_buffer_scaled_by_pixel_ratio() {
        let host = FixedHost::new(150.0, 60.0).with_pixel_ratio(2.0);
        let capture = SignatureCapture::mounted(host, &SignatureConfig::default()).unwrap();
        assert_eq!(capture.width(), 300);
        assert_eq!(capture.height(), 120);
    }

    #[test]
    fn test_invalid_color_rejected() {
        let config = SignatureConfig {
            pen_color: "definitely-not-a-color".to_string(),
            ..Default::default()
        };
        let result = SignatureCapture::mounted(FixedHost::new(10.0, 10.0), &config);
        assert!(matches!(result, Err(SignatureError::InvalidColor { .. })));
    }

    #[test]
    fn test_unmounted_capture_is_inert() {
        let mut capture = SignatureCapture::new(None, &SignatureConfig::default()).unwrap();
        assert!(!capture.is_mounted());

        draw(&mut capture, &[(0.0, 0.0), (10.0, 10.0)]);
        capture.clear();
        capture.undo();

        assert!(capture.is_empty());
        assert_eq!(capture.stroke_count(), 0);
        assert!(matches!(capture.export_base64(), Err(SignatureError::NotMounted)));
    }

    #[test]
    fn test_scenario_draw_then_undo() {
        let mut capture = capture(50.0, 50.0);
        draw(&mut capture, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert!(!capture.is_empty());
        assert_eq!(capture.stroke_count(), 1);
        assert_eq!(
            capture.strokes()[0].points(),
            &[Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)]
        );

        capture.undo();
        assert!(capture.is_empty());
        assert_eq!(capture.stroke_count(), 0);
    }

    #[test]
    fn test_is_valid_thresholds() {
        let mut short = capture(100.0, 50.0);
        draw(&mut short, &line(5));
        assert!(!short.is_valid(1, 10));

        let mut long = capture(100.0, 50.0);
        draw(&mut long, &line(12));
        assert!(long.is_valid(1, 10));
        assert!(!long.is_valid(2, 10));
    }

    #[test]
    fn test_change_listener_receives_commits() {
        let mut capture = capture(60.0, 40.0);
        let seen: Rc<RefCell<Vec<SignatureChange>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        capture.on_change(move |change| sink.borrow_mut().push(change.clone()));

        draw(&mut capture, &[(5.0, 5.0), (20.0, 20.0)]);
        capture.clear();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(!seen[0].is_empty);
        assert!(seen[0].data_url.as_deref().unwrap().starts_with("data:image/png;base64,"));
        assert!(seen[1].is_empty);
        assert!(seen[1].data_url.is_none());
    }

    #[test]
    fn test_off_change() {
        let mut capture = capture(20.0, 20.0);
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = capture.on_change(move |_| *sink.borrow_mut() += 1);

        capture.clear();
        assert!(capture.off_change(id));
        assert!(!capture.off_change(id));
        capture.clear();

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_info() {
        let mut capture = capture(100.0, 40.0);
        draw(&mut capture, &line(12));
        let info = capture.info();
        assert!(!info.is_empty);
        assert!(info.is_valid);
        assert_eq!(info.stroke_count, 1);
        assert_eq!(info.total_points, 12);
        assert_eq!((info.width, info.height), (100, 40));
    }
}
