mod font;
mod pixel;

pub use font::{font_from_bytes, system_font};
pub use pixel::PixelCanvas;

use crate::colors::RgbaColor;

/// An axis-aligned rectangle in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2., self.y + self.height / 2.)
    }
}

/// An axis-aligned line segment with a thickness in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub thickness: f64,
}

impl Line {
    pub fn horizontal(x0: f64, x1: f64, y: f64, thickness: f64) -> Self {
        Self {
            x0,
            y0: y,
            x1,
            y1: y,
            thickness,
        }
    }

    pub fn vertical(x: f64, y0: f64, y1: f64, thickness: f64) -> Self {
        Self {
            x0: x,
            y0,
            x1: x,
            y1,
            thickness,
        }
    }
}

/// Horizontal anchoring of a text run relative to its x coordinate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// The minimal drawing capability the plot renderers require.
///
/// Keeping this surface small allows exercising the rendering logic against a
/// recording double without any graphics backend.
pub trait Canvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn fill_rect(&mut self, rect: Rect, color: RgbaColor);

    fn draw_line(&mut self, line: Line, color: RgbaColor);

    /// Draws a single line of text. `y` is the vertical center of the line
    /// box; `x` is interpreted according to `align`.
    fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        size: f32,
        align: TextAlign,
        color: RgbaColor,
    );
}
