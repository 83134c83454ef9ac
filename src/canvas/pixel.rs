use crate::canvas::{Canvas, Line, Rect, TextAlign};
use crate::colors::RgbaColor;
use crate::error;
use crate::util::Result;
use fontdue::Font;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use snafu::ResultExt;
use std::io::Cursor;
use std::path::Path;

/// A canvas backed by an in-memory RGBA pixel buffer.
///
/// Created with a white background. Text is rasterized with the given font
/// and alpha-blended into the buffer.
pub struct PixelCanvas {
    image: RgbaImage,
    font: Font,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32, font: Font) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])),
            font,
        }
    }

    /// Outputs png bytes of the canvas
    pub fn into_png(self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());

        DynamicImage::ImageRgba8(self.image)
            .write_to(&mut buffer, ImageFormat::Png)
            .context(error::ImageEncodingSnafu)?;

        Ok(buffer.into_inner())
    }

    /// Writes the canvas to `path` as a png file
    pub fn write_png(self, path: &Path) -> Result<()> {
        let bytes = self.into_png()?;
        std::fs::write(path, bytes).context(error::ImageFileSnafu)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars()
            .map(|ch| self.font.metrics(ch, size).advance_width)
            .sum()
    }

    /// Blends `color` into the pixel at (x, y) with the given coverage.
    fn blend_pixel(&mut self, x: i64, y: i64, color: RgbaColor, coverage: f32) {
        if x < 0 || y < 0 || x >= i64::from(self.image.width()) || y >= i64::from(self.image.height())
        {
            return;
        }

        let [r, g, b, a] = color.channels();
        let alpha = coverage * (f32::from(a) / 255.);
        if alpha <= 0. {
            return;
        }

        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        for (channel, source) in [r, g, b].into_iter().enumerate() {
            let blended =
                f32::from(source) * alpha + f32::from(pixel.0[channel]) * (1. - alpha);
            pixel.0[channel] = blended.round().clamp(0., 255.) as u8;
        }
        pixel.0[3] = pixel.0[3].max((alpha * 255.).round() as u8);
    }
}

impl Canvas for PixelCanvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn fill_rect(&mut self, rect: Rect, color: RgbaColor) {
        let x0 = rect.x.round().max(0.) as u32;
        let y0 = rect.y.round().max(0.) as u32;
        let x1 = ((rect.x + rect.width).round() as i64).clamp(0, i64::from(self.width())) as u32;
        let y1 = ((rect.y + rect.height).round() as i64).clamp(0, i64::from(self.height())) as u32;

        let pixel = Rgba::from(color);
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, pixel);
            }
        }
    }

    fn draw_line(&mut self, line: Line, color: RgbaColor) {
        // only axis-aligned segments are supported
        let half = line.thickness / 2.;

        let rect = if (line.y0 - line.y1).abs() < f64::EPSILON {
            Rect::new(
                line.x0.min(line.x1),
                line.y0 - half,
                (line.x1 - line.x0).abs(),
                line.thickness,
            )
        } else if (line.x0 - line.x1).abs() < f64::EPSILON {
            Rect::new(
                line.x0 - half,
                line.y0.min(line.y1),
                line.thickness,
                (line.y1 - line.y0).abs(),
            )
        } else {
            debug_assert!(false, "only axis-aligned lines are supported");
            return;
        };

        self.fill_rect(rect, color);
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        size: f32,
        align: TextAlign,
        color: RgbaColor,
    ) {
        let width = self.text_width(text, size);
        let start_x = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - f64::from(width) / 2.,
            TextAlign::Right => x - f64::from(width),
        };

        // y=0 is the glyph baseline in fontdue, so shift the requested line
        // center by the ascent/descent of the font
        let (ascent, descent) = self
            .font
            .horizontal_line_metrics(size)
            .map_or((size * 0.8, -size * 0.2), |m| (m.ascent, m.descent));
        let baseline = y + f64::from(ascent + descent) / 2.;

        let mut pen_x = start_x;
        for ch in text.chars() {
            let (metrics, bitmap) = self.font.rasterize(ch, size);

            let glyph_left = pen_x + f64::from(metrics.xmin);
            let glyph_top = baseline - f64::from(metrics.ymin) - metrics.height as f64;

            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let coverage = f32::from(bitmap[row * metrics.width + col]) / 255.;
                    if coverage > 0. {
                        self.blend_pixel(
                            (glyph_left + col as f64).round() as i64,
                            (glyph_top + row as f64).round() as i64,
                            color,
                            coverage,
                        );
                    }
                }
            }

            pen_x += f64::from(metrics.advance_width);
        }
    }
}
