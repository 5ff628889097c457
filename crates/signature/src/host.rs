//! The drawing surface as seen by the capture component

use ecoreport_config::SurfaceMetrics;
use ecoreport_ipc::ClientRect;

/// Handle to the on-screen element the signature is drawn on.
///
/// In the browser this is a `<canvas>`; tests use a fixed geometry.
/// The rect is re-queried on every pointer event because the element
/// moves when the page scrolls.
pub trait SurfaceHost {
    /// Current bounding client rect of the element, in CSS pixels
    fn client_rect(&self) -> ClientRect;

    /// Display pixel density (`window.devicePixelRatio`)
    fn device_pixel_ratio(&self) -> f32;

    /// Size metrics derived from the rect and pixel ratio
    fn metrics(&self) -> SurfaceMetrics {
        let rect = self.client_rect();
        SurfaceMetrics::new(rect.width, rect.height, self.device_pixel_ratio())
    }
}

/// A host with fixed geometry, for headless use and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedHost {
    pub rect: ClientRect,
    pub device_pixel_ratio: f32,
}

impl FixedHost {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            rect: ClientRect::new(0.0, 0.0, width, height),
            device_pixel_ratio: 1.0,
        }
    }

    pub fn with_offset(mut self, left: f32, top: f32) -> Self {
        self.rect.left = left;
        self.rect.top = top;
        self
    }

    pub fn with_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }
}

impl SurfaceHost for FixedHost {
    fn client_rect(&self) -> ClientRect {
        self.rect
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }
}

impl<T: SurfaceHost + ?Sized> SurfaceHost for std::rc::Rc<T> {
    fn client_rect(&self) -> ClientRect {
        (**self).client_rect()
    }

    fn device_pixel_ratio(&self) -> f32 {
        (**self).device_pixel_ratio()
    }
}
