use crate::canvas::{Canvas, Line, PixelCanvas, Rect, TextAlign, system_font};
use crate::colors::{ColorMapper, Colormap, ColormapName, RgbaColor};
use crate::eval::ConfusionMatrix;
use crate::util::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default canvas size, 8x7 inches at 100 dpi.
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 700;

const GRID_THICKNESS: f64 = 1.5;
const COLORBAR_STEPS: usize = 128;

/// Display options for a [`ConfusionMatrixPlot`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Text displayed above the matrix.
    pub title: String,
    /// Gradient that drives the cell colors and the legend bar.
    pub colormap: ColormapName,
    /// If true, cells display row-normalized proportions instead of raw counts.
    pub normalize: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "Confusion matrix".to_string(),
            colormap: ColormapName::Purples,
            normalize: false,
        }
    }
}

impl RenderOptions {
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_colormap(mut self, colormap: ColormapName) -> Self {
        self.colormap = colormap;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

/// An annotated heatmap of a [`ConfusionMatrix`].
///
/// Cell color intensity is driven by the row-normalized value in both display
/// modes, so toggling `normalize` changes the cell text but never the colors.
/// The rendered figure carries the class labels on the left ("True") and top
/// ("Predicted"), the overall accuracy below the matrix, and a vertical
/// color-scale legend to the right.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ConfusionMatrixPlot {
    matrix: ConfusionMatrix,
    options: RenderOptions,
}

impl ConfusionMatrixPlot {
    pub fn new(matrix: ConfusionMatrix, options: RenderOptions) -> Self {
        Self { matrix, options }
    }

    pub fn with_defaults(matrix: ConfusionMatrix) -> Self {
        Self::new(matrix, RenderOptions::default())
    }

    /// Draws the plot onto `canvas`.
    ///
    /// All derived values are computed before the first drawing command, so a
    /// failure never leaves a partially drawn canvas behind.
    ///
    /// # Errors
    ///
    /// Fails with `Error::DegenerateInput` if any matrix row sums to zero.
    pub fn draw<C: Canvas>(&self, canvas: &mut C) -> Result<()> {
        let normalized = self.matrix.row_normalized()?;
        let accuracy = self.matrix.accuracy()?;
        let row_sums = self.matrix.row_sums();

        let colormap = Colormap::named(self.options.colormap);
        let mapper = colormap.create_color_mapper();

        let n = self.matrix.dimension();
        let layout = Layout::new(canvas.width(), canvas.height(), n);

        // cell backgrounds, row-normalized intensity in both display modes
        for (i, row) in normalized.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                canvas.fill_rect(layout.cell(i, j), mapper.call(value));
            }
        }

        self.draw_grid(canvas, &layout, n);
        self.draw_annotations(canvas, &layout, &normalized, &row_sums);
        self.draw_axes(canvas, &layout, accuracy);
        self.draw_colorbar(canvas, &layout, &mapper);

        Ok(())
    }

    /// Renders the plot into a fresh pixel buffer and encodes it as png.
    ///
    /// # Errors
    ///
    /// Fails with `Error::NoFontAvailable` if the system has no usable font,
    /// and with the `draw` errors for invalid matrices.
    pub fn to_png(&self, width: u32, height: u32) -> Result<Vec<u8>> {
        let mut canvas = PixelCanvas::new(width, height, system_font()?);
        self.draw(&mut canvas)?;
        canvas.into_png()
    }

    /// Renders the plot and writes it to `path` as a png file.
    pub fn write_png(&self, path: &Path, width: u32, height: u32) -> Result<()> {
        let mut canvas = PixelCanvas::new(width, height, system_font()?);
        self.draw(&mut canvas)?;
        canvas.write_png(path)
    }

    fn draw_grid<C: Canvas>(&self, canvas: &mut C, layout: &Layout, n: usize) {
        let plot = layout.plot;

        for k in 0..=n {
            let y = plot.y + k as f64 * layout.cell_height;
            canvas.draw_line(
                Line::horizontal(plot.x, plot.x + plot.width, y, GRID_THICKNESS),
                RgbaColor::black(),
            );

            let x = plot.x + k as f64 * layout.cell_width;
            canvas.draw_line(
                Line::vertical(x, plot.y, plot.y + plot.height, GRID_THICKNESS),
                RgbaColor::black(),
            );
        }
    }

    fn draw_annotations<C: Canvas>(
        &self,
        canvas: &mut C,
        layout: &Layout,
        normalized: &[Vec<f64>],
        row_sums: &[u64],
    ) {
        let n = self.matrix.dimension();

        for i in 0..n {
            for j in 0..n {
                let count = self.matrix.count(i, j);

                let text = if self.options.normalize {
                    format!("{:.4}", normalized[i][j])
                } else {
                    count.to_string()
                };

                // readability heuristic from raw counts, even in normalized mode
                let color = if 2 * count > row_sums[i] {
                    RgbaColor::white()
                } else {
                    RgbaColor::black()
                };

                let (x, y) = layout.cell(i, j).center();
                canvas.draw_text(&text, x, y, layout.cell_text_size, TextAlign::Center, color);
            }
        }
    }

    fn draw_axes<C: Canvas>(&self, canvas: &mut C, layout: &Layout, accuracy: f64) {
        let black = RgbaColor::black();
        let (center_x, center_y) = layout.plot.center();

        canvas.draw_text(
            &self.options.title,
            center_x,
            layout.title_y,
            layout.title_size,
            TextAlign::Center,
            black,
        );

        // column labels go above the matrix, row labels to its left
        canvas.draw_text(
            "Predicted",
            center_x,
            layout.predicted_y,
            layout.axis_title_size,
            TextAlign::Center,
            black,
        );
        for (j, label) in self.matrix.labels().iter().enumerate() {
            let (x, _) = layout.cell(0, j).center();
            canvas.draw_text(
                label,
                x,
                layout.column_label_y,
                layout.tick_label_size,
                TextAlign::Center,
                black,
            );
        }

        // row labels on the left
        canvas.draw_text(
            "True",
            layout.true_x,
            center_y,
            layout.axis_title_size,
            TextAlign::Center,
            black,
        );
        for (i, label) in self.matrix.labels().iter().enumerate() {
            let (_, y) = layout.cell(i, 0).center();
            canvas.draw_text(
                label,
                layout.row_label_x,
                y,
                layout.tick_label_size,
                TextAlign::Right,
                black,
            );
        }

        canvas.draw_text(
            &format!("Overall Accuracy={accuracy:.4}"),
            center_x,
            layout.caption_y,
            layout.tick_label_size,
            TextAlign::Center,
            black,
        );
    }

    fn draw_colorbar<C: Canvas>(&self, canvas: &mut C, layout: &Layout, mapper: &ColorMapper) {
        let bar = layout.colorbar;
        let slice_height = bar.height / COLORBAR_STEPS as f64;

        // low values at the bottom
        for step in 0..COLORBAR_STEPS {
            let value = step as f64 / (COLORBAR_STEPS - 1) as f64;
            let y = bar.y + bar.height - (step + 1) as f64 * slice_height;
            canvas.fill_rect(
                Rect::new(bar.x, y, bar.width, slice_height),
                mapper.call(value),
            );
        }

        let black = RgbaColor::black();
        canvas.draw_line(
            Line::horizontal(bar.x, bar.x + bar.width, bar.y, 1.),
            black,
        );
        canvas.draw_line(
            Line::horizontal(bar.x, bar.x + bar.width, bar.y + bar.height, 1.),
            black,
        );
        canvas.draw_line(Line::vertical(bar.x, bar.y, bar.y + bar.height, 1.), black);
        canvas.draw_line(
            Line::vertical(bar.x + bar.width, bar.y, bar.y + bar.height, 1.),
            black,
        );

        let (bar_center_x, _) = bar.center();
        canvas.draw_text(
            "Accuracy per label",
            bar_center_x,
            layout.colorbar_label_y,
            layout.tick_label_size,
            TextAlign::Center,
            black,
        );
    }
}

/// Pixel-space geometry of the figure, derived from the canvas size.
struct Layout {
    plot: Rect,
    colorbar: Rect,
    cell_width: f64,
    cell_height: f64,
    title_y: f64,
    predicted_y: f64,
    column_label_y: f64,
    row_label_x: f64,
    true_x: f64,
    caption_y: f64,
    colorbar_label_y: f64,
    title_size: f32,
    axis_title_size: f32,
    tick_label_size: f32,
    cell_text_size: f32,
}

impl Layout {
    fn new(width: u32, height: u32, n: usize) -> Self {
        let w = f64::from(width);
        let h = f64::from(height);

        let plot = Rect::new(0.16 * w, 0.14 * h, 0.54 * w, 0.72 * h);
        let colorbar = Rect::new(plot.x + plot.width + 0.06 * w, plot.y, 0.06 * w, plot.height);

        let cell_height = plot.height / n as f64;
        let cell_text_size = (0.35 * cell_height).min(0.032 * h) as f32;

        Self {
            plot,
            colorbar,
            cell_width: plot.width / n as f64,
            cell_height,
            title_y: 0.04 * h,
            predicted_y: 0.085 * h,
            column_label_y: 0.115 * h,
            row_label_x: plot.x - 0.015 * w,
            true_x: 0.04 * w,
            caption_y: 0.92 * h,
            colorbar_label_y: 0.115 * h,
            title_size: (0.035 * h) as f32,
            axis_title_size: (0.026 * h) as f32,
            tick_label_size: (0.022 * h) as f32,
            cell_text_size,
        }
    }

    fn cell(&self, i: usize, j: usize) -> Rect {
        Rect::new(
            self.plot.x + j as f64 * self.cell_width,
            self.plot.y + i as f64 * self.cell_height,
            self.cell_width,
            self.cell_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::util::test::RecordingCanvas;

    fn example_matrix() -> ConfusionMatrix {
        ConfusionMatrix::new(
            vec![vec![293, 78, 94], vec![60, 265, 141], vec![59, 205, 201]],
            vec!["Label1".into(), "Label2".into(), "Label3".into()],
        )
        .unwrap()
    }

    fn drawn(options: RenderOptions) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        ConfusionMatrixPlot::new(example_matrix(), options)
            .draw(&mut canvas)
            .unwrap();
        canvas
    }

    #[test]
    fn normalization_changes_text_but_not_colors() {
        let raw = drawn(RenderOptions::default());
        let normalized = drawn(RenderOptions::default().with_normalize(true));

        assert_eq!(raw.fill_colors(), normalized.fill_colors());
        assert_ne!(raw.texts(), normalized.texts());
    }

    #[test]
    fn raw_mode_displays_counts() {
        let canvas = drawn(RenderOptions::default());
        let texts: Vec<String> = canvas.texts().into_iter().map(|(t, _)| t).collect();

        assert_eq!(
            &texts[..9],
            &["293", "78", "94", "60", "265", "141", "59", "205", "201"]
        );
    }

    #[test]
    fn normalized_mode_displays_proportions() {
        let canvas = drawn(RenderOptions::default().with_normalize(true));
        let texts: Vec<String> = canvas.texts().into_iter().map(|(t, _)| t).collect();

        // row 0 sums to 465
        assert_eq!(&texts[..3], &["0.6301", "0.1677", "0.2022"]);
    }

    #[test]
    fn annotation_color_follows_raw_majority_threshold() {
        // white text only where the raw count exceeds half its row sum,
        // in normalized mode as well
        for options in [
            RenderOptions::default(),
            RenderOptions::default().with_normalize(true),
        ] {
            let canvas = drawn(options);
            let cell_colors: Vec<RgbaColor> = canvas
                .texts()
                .into_iter()
                .take(9)
                .map(|(_, color)| color)
                .collect();

            let white = RgbaColor::white();
            let black = RgbaColor::black();
            assert_eq!(
                cell_colors,
                vec![
                    white, black, black, // 293 of 465
                    black, white, black, // 265 of 466
                    black, black, black, // 201 of 465, no majority
                ]
            );
        }
    }

    #[test]
    fn drawing_is_idempotent() {
        let plot = ConfusionMatrixPlot::with_defaults(example_matrix());

        let mut first = RecordingCanvas::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        let mut second = RecordingCanvas::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        plot.draw(&mut first).unwrap();
        plot.draw(&mut second).unwrap();

        assert_eq!(first.commands, second.commands);
    }

    #[test]
    fn figure_carries_labels_titles_and_caption() {
        let canvas = drawn(RenderOptions::default().with_title("Best estimator"));
        let texts: Vec<String> = canvas.texts().into_iter().map(|(t, _)| t).collect();

        for expected in [
            "Best estimator",
            "Predicted",
            "True",
            "Overall Accuracy=0.5437",
            "Accuracy per label",
        ] {
            assert!(texts.iter().any(|t| t == expected), "missing {expected:?}");
        }

        // class labels appear twice, on the top and on the left
        for label in ["Label1", "Label2", "Label3"] {
            assert_eq!(texts.iter().filter(|t| *t == label).count(), 2);
        }
    }

    #[test]
    fn grid_lines_at_every_boundary() {
        let canvas = drawn(RenderOptions::default());

        // 2 * (n + 1) separators plus 4 colorbar border lines
        assert_eq!(canvas.line_count(), 2 * (3 + 1) + 4);
    }

    #[test]
    fn cells_and_colorbar_account_for_all_fills() {
        let canvas = drawn(RenderOptions::default());

        assert_eq!(canvas.fill_colors().len(), 3 * 3 + COLORBAR_STEPS);
    }

    #[test]
    fn cell_color_comes_from_the_normalized_value() {
        let canvas = drawn(RenderOptions::default());
        let mapper = Colormap::named(ColormapName::Purples).create_color_mapper();

        assert_eq!(canvas.fill_colors()[0], mapper.call(293. / 465.));
    }

    #[test]
    fn zero_sum_row_aborts_before_any_drawing() {
        let matrix = ConfusionMatrix::new(
            vec![vec![5, 1], vec![0, 0]],
            vec!["a".into(), "b".into()],
        )
        .unwrap();

        let mut canvas = RecordingCanvas::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        let result = ConfusionMatrixPlot::with_defaults(matrix).draw(&mut canvas);

        assert!(matches!(result, Err(Error::DegenerateInput { row: 1 })));
        assert!(canvas.commands.is_empty());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: RenderOptions = serde_json::from_str("{}").unwrap();

        assert_eq!(options, RenderOptions::default());

        let options: RenderOptions =
            serde_json::from_str(r#"{"colormap": "blues", "normalize": true}"#).unwrap();
        assert_eq!(options.colormap, ColormapName::Blues);
        assert!(options.normalize);
        assert_eq!(options.title, "Confusion matrix");
    }
}
