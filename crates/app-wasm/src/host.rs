//! `<canvas>` as a signature surface host

use ecoreport_ipc::ClientRect;
use signature::SurfaceHost;
use web_sys::HtmlCanvasElement;

pub struct CanvasHost {
    canvas: HtmlCanvasElement,
}

impl CanvasHost {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }
}

impl SurfaceHost for CanvasHost {
    fn client_rect(&self) -> ClientRect {
        let rect = self.canvas.get_bounding_client_rect();
        ClientRect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        )
    }

    fn device_pixel_ratio(&self) -> f32 {
        web_sys::window().map_or(1.0, |w| w.device_pixel_ratio() as f32)
    }
}
