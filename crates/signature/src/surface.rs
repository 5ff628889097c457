//! CPU raster surface backing the signature pad

use image::RgbaImage;

/// Rectangle of pixels modified since the last upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl DirtyRegion {
    fn union(self, other: DirtyRegion) -> DirtyRegion {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = (self.x + self.width).max(other.x + other.width);
        let y1 = (self.y + self.height).max(other.y + other.height);
        DirtyRegion {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }
}

/// An RGBA CPU surface.
/// Stores pixels as straight-alpha [f32; 4] in row-major order.
pub struct CpuSurface {
    pub width: u32,
    pub height: u32,
    pixels: Vec<[f32; 4]>,
    dirty: Option<DirtyRegion>,
}

impl CpuSurface {
    /// Create a new surface initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![[0.0, 0.0, 0.0, 0.0]; pixel_count],
            dirty: None,
        }
    }

    /// Fill the whole surface with a solid color
    pub fn fill(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
        self.mark_region_dirty(0, 0, self.width, self.height);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Get a pixel, or None if out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Replace a pixel. Does nothing if out of bounds.
    /// Does not touch the dirty region; callers mark the affected area.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Composite a color over a pixel (source-over)
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        self.pixels[i] = source_over(color, self.pixels[i]);
    }

    /// Draw an image with its top-left corner at (x, y), at natural size.
    /// Pixels falling outside the surface are clipped.
    pub fn draw_image(&mut self, image: &RgbaImage, x: u32, y: u32) {
        let w = image.width().min(self.width.saturating_sub(x));
        let h = image.height().min(self.height.saturating_sub(y));
        for iy in 0..h {
            for ix in 0..w {
                let [r, g, b, a] = image.get_pixel(ix, iy).0;
                let src = [
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                    a as f32 / 255.0,
                ];
                self.blend_pixel(x + ix, y + iy, src);
            }
        }
        self.mark_region_dirty(x, y, w, h);
    }

    /// Convert the surface to 8-bit RGBA for encoding
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let p = self.pixels[(y as usize) * (self.width as usize) + (x as usize)];
            image::Rgba(to_rgba8(p))
        })
    }

    /// 8-bit RGBA bytes of a region, row-major, clamped to surface bounds
    pub fn region_rgba8(&self, region: DirtyRegion) -> Vec<u8> {
        let x_end = (region.x + region.width).min(self.width);
        let y_end = (region.y + region.height).min(self.height);
        let mut bytes = Vec::new();
        for y in region.y.min(y_end)..y_end {
            for x in region.x.min(x_end)..x_end {
                let i = (y as usize) * (self.width as usize) + (x as usize);
                bytes.extend_from_slice(&to_rgba8(self.pixels[i]));
            }
        }
        bytes
    }

    /// Record a rectangle as modified, clamped to the surface
    pub fn mark_region_dirty(&mut self, x: u32, y: u32, w: u32, h: u32) {
        if w == 0 || h == 0 || x >= self.width || y >= self.height {
            return;
        }
        let region = DirtyRegion {
            x,
            y,
            width: w.min(self.width - x),
            height: h.min(self.height - y),
        };
        self.dirty = Some(match self.dirty {
            Some(existing) => existing.union(region),
            None => region,
        });
    }

    /// Take the modified region and reset tracking
    pub fn take_dirty_region(&mut self) -> Option<DirtyRegion> {
        self.dirty.take()
    }

    #[inline]
    pub fn has_dirty_region(&self) -> bool {
        self.dirty.is_some()
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }
}

/// Straight-alpha source-over compositing
#[inline]
pub fn source_over(src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
    let src_a = src[3];
    let out_a = src_a + dst[3] * (1.0 - src_a);
    if out_a <= 0.0 {
        return [0.0, 0.0, 0.0, 0.0];
    }
    let channel = |s: f32, d: f32| (s * src_a + d * dst[3] * (1.0 - src_a)) / out_a;
    [
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        out_a,
    ]
}

#[inline]
fn to_rgba8(p: [f32; 4]) -> [u8; 4] {
    p.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}
