mod draw_list;
mod renderer;

pub use draw_list::{rasterize, DrawList, DrawRect, Rgba};
pub use renderer::Renderer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
