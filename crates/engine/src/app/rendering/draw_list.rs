use super::Viewport;

pub type Rgba = [u8; 4];

const DEFAULT_CLEAR_COLOR: Rgba = [20, 26, 56, 255];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub color: Rgba,
}

/// Screen-space rectangles in draw order, filled back to front.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    clear_color: Rgba,
    rects: Vec<DrawRect>,
}

impl Default for DrawList {
    fn default() -> Self {
        Self {
            clear_color: DEFAULT_CLEAR_COLOR,
            rects: Vec::new(),
        }
    }
}

impl DrawList {
    pub fn clear(&mut self) {
        self.clear_color = DEFAULT_CLEAR_COLOR;
        self.rects.clear();
    }

    pub fn set_clear_color(&mut self, color: Rgba) {
        self.clear_color = color;
    }

    pub fn clear_color(&self) -> Rgba {
        self.clear_color
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        if w <= 0.0 || h <= 0.0 || !(x.is_finite() && y.is_finite()) {
            return;
        }
        self.rects.push(DrawRect { x, y, w, h, color });
    }

    pub fn outline_rect(&mut self, x: f32, y: f32, w: f32, h: f32, thickness: f32, color: Rgba) {
        let t = thickness.min(w * 0.5).min(h * 0.5);
        self.fill_rect(x, y, w, t, color);
        self.fill_rect(x, y + h - t, w, t, color);
        self.fill_rect(x, y + t, t, h - 2.0 * t, color);
        self.fill_rect(x + w - t, y + t, t, h - 2.0 * t, color);
    }

    pub fn rects(&self) -> &[DrawRect] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Fills `frame` (RGBA8, row-major, `viewport` sized) from the draw list.
/// Rectangles are clipped to the viewport; translucent colors blend over
/// what is already there.
pub fn rasterize(list: &DrawList, frame: &mut [u8], viewport: Viewport) {
    if viewport.is_empty() {
        return;
    }
    let expected = viewport.width as usize * viewport.height as usize * 4;
    if frame.len() < expected {
        return;
    }

    for pixel in frame[..expected].chunks_exact_mut(4) {
        pixel.copy_from_slice(&list.clear_color);
    }

    for rect in &list.rects {
        let Some(span) = clip_rect(rect, viewport) else {
            continue;
        };
        let stride = viewport.width as usize * 4;
        for row in span.top..span.bottom {
            let row_start = row as usize * stride;
            for col in span.left..span.right {
                let offset = row_start + col as usize * 4;
                blend_pixel(&mut frame[offset..offset + 4], rect.color);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelSpan {
    left: u32,
    right: u32,
    top: u32,
    bottom: u32,
}

fn clip_rect(rect: &DrawRect, viewport: Viewport) -> Option<PixelSpan> {
    let left = rect.x.round().max(0.0);
    let top = rect.y.round().max(0.0);
    let right = (rect.x + rect.w).round().min(viewport.width as f32);
    let bottom = (rect.y + rect.h).round().min(viewport.height as f32);
    if right <= left || bottom <= top {
        return None;
    }
    Some(PixelSpan {
        left: left as u32,
        right: right as u32,
        top: top as u32,
        bottom: bottom as u32,
    })
}

fn blend_pixel(dst: &mut [u8], src: Rgba) {
    match src[3] {
        255 => dst.copy_from_slice(&src),
        0 => {}
        alpha => {
            let a = alpha as u32;
            let inv = 255 - a;
            for channel in 0..3 {
                let mixed = (src[channel] as u32 * a + dst[channel] as u32 * inv) / 255;
                dst[channel] = mixed as u8;
            }
            dst[3] = 255;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel_at(frame: &[u8], viewport: Viewport, x: u32, y: u32) -> Rgba {
        let offset = (y as usize * viewport.width as usize + x as usize) * 4;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn rasterize_fills_clear_color_and_rect() {
        let viewport = Viewport {
            width: 8,
            height: 8,
        };
        let mut frame = vec![0u8; 8 * 8 * 4];
        let mut list = DrawList::default();
        list.set_clear_color([1, 2, 3, 255]);
        list.fill_rect(2.0, 2.0, 2.0, 2.0, [200, 0, 0, 255]);

        rasterize(&list, &mut frame, viewport);

        assert_eq!(pixel_at(&frame, viewport, 0, 0), [1, 2, 3, 255]);
        assert_eq!(pixel_at(&frame, viewport, 2, 2), [200, 0, 0, 255]);
        assert_eq!(pixel_at(&frame, viewport, 3, 3), [200, 0, 0, 255]);
        assert_eq!(pixel_at(&frame, viewport, 4, 4), [1, 2, 3, 255]);
    }

    #[test]
    fn rects_outside_viewport_are_clipped() {
        let viewport = Viewport {
            width: 4,
            height: 4,
        };
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut list = DrawList::default();
        list.fill_rect(-10.0, -10.0, 12.0, 12.0, [9, 9, 9, 255]);
        list.fill_rect(100.0, 0.0, 5.0, 5.0, [7, 7, 7, 255]);

        rasterize(&list, &mut frame, viewport);

        assert_eq!(pixel_at(&frame, viewport, 0, 0), [9, 9, 9, 255]);
        assert_eq!(pixel_at(&frame, viewport, 1, 1), [9, 9, 9, 255]);
        assert_eq!(pixel_at(&frame, viewport, 2, 2), DEFAULT_CLEAR_COLOR);
    }

    #[test]
    fn translucent_rect_blends_over_clear_color() {
        let viewport = Viewport {
            width: 1,
            height: 1,
        };
        let mut frame = vec![0u8; 4];
        let mut list = DrawList::default();
        list.set_clear_color([0, 0, 0, 255]);
        list.fill_rect(0.0, 0.0, 1.0, 1.0, [255, 255, 255, 51]);

        rasterize(&list, &mut frame, viewport);

        assert_eq!(pixel_at(&frame, viewport, 0, 0), [51, 51, 51, 255]);
    }

    #[test]
    fn degenerate_rects_are_not_recorded() {
        let mut list = DrawList::default();
        list.fill_rect(0.0, 0.0, 0.0, 4.0, [1, 1, 1, 255]);
        list.fill_rect(f32::NAN, 0.0, 4.0, 4.0, [1, 1, 1, 255]);
        assert!(list.is_empty());
    }

    #[test]
    fn outline_emits_four_edges() {
        let mut list = DrawList::default();
        list.outline_rect(0.0, 0.0, 10.0, 10.0, 2.0, [1, 1, 1, 255]);
        assert_eq!(list.len(), 4);
    }
}
