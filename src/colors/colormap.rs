use crate::error;
use crate::util::Result;
use ordered_float::{FloatIsNan, NotNan};
use serde::{Deserialize, Serialize};
use snafu::ensure;
use std::convert::TryFrom;
use std::str::FromStr;

/// A colormap maps values from its domain onto a continuous color gradient.
///
/// Gradients are defined by breakpoints and linearly interpolated in between.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Colormap {
    breakpoints: Breakpoints,
}

/// Names of the built-in sequential gradients.
///
/// All built-in gradients span the domain `[0, 1]`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    PartialEq,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ColormapName {
    #[default]
    Purples,
    Blues,
    Greens,
    Oranges,
    Reds,
    Greys,
    Viridis,
}

/// Gradient anchors of the built-in colormaps at 0, ¼, ½, ¾ and 1.
type Anchors = [(f64, [u8; 3]); 5];

const PURPLES: Anchors = [
    (0.00, [252, 251, 253]),
    (0.25, [218, 218, 235]),
    (0.50, [158, 154, 200]),
    (0.75, [106, 81, 163]),
    (1.00, [63, 0, 125]),
];

const BLUES: Anchors = [
    (0.00, [247, 251, 255]),
    (0.25, [198, 219, 239]),
    (0.50, [107, 174, 214]),
    (0.75, [33, 113, 181]),
    (1.00, [8, 48, 107]),
];

const GREENS: Anchors = [
    (0.00, [247, 252, 245]),
    (0.25, [199, 233, 192]),
    (0.50, [116, 196, 118]),
    (0.75, [35, 139, 69]),
    (1.00, [0, 68, 27]),
];

const ORANGES: Anchors = [
    (0.00, [255, 245, 235]),
    (0.25, [253, 208, 162]),
    (0.50, [253, 141, 60]),
    (0.75, [217, 72, 1]),
    (1.00, [127, 39, 4]),
];

const REDS: Anchors = [
    (0.00, [255, 245, 240]),
    (0.25, [252, 187, 161]),
    (0.50, [251, 106, 74]),
    (0.75, [203, 24, 29]),
    (1.00, [103, 0, 13]),
];

const GREYS: Anchors = [
    (0.00, [255, 255, 255]),
    (0.25, [217, 217, 217]),
    (0.50, [150, 150, 150]),
    (0.75, [82, 82, 82]),
    (1.00, [0, 0, 0]),
];

const VIRIDIS: Anchors = [
    (0.00, [68, 1, 84]),
    (0.25, [59, 82, 139]),
    (0.50, [33, 145, 140]),
    (0.75, [94, 201, 98]),
    (1.00, [253, 231, 37]),
];

impl Colormap {
    /// A linear gradient linearly interpolates values within breakpoints of a color table
    pub fn linear_gradient(breakpoints: Breakpoints) -> Result<Self> {
        ensure!(
            breakpoints.len() >= 2,
            error::ColormapSnafu {
                details: "a linear gradient colormap must have at least two breakpoints"
            }
        );
        ensure!(
            breakpoints.windows(2).all(|w| w[0].value <= w[1].value),
            error::ColormapSnafu {
                details: "a colormap's breakpoints must be ascending"
            }
        );

        let colormap = Self { breakpoints };

        ensure!(
            colormap.min_value() < colormap.max_value(),
            error::ColormapSnafu {
                details: "a colormap's min value must be smaller than its max value"
            }
        );

        Ok(colormap)
    }

    /// Returns the built-in gradient for `name`.
    pub fn named(name: ColormapName) -> Self {
        let anchors = match name {
            ColormapName::Purples => &PURPLES,
            ColormapName::Blues => &BLUES,
            ColormapName::Greens => &GREENS,
            ColormapName::Oranges => &ORANGES,
            ColormapName::Reds => &REDS,
            ColormapName::Greys => &GREYS,
            ColormapName::Viridis => &VIRIDIS,
        };

        // anchor tables are static and well-formed, no validation needed
        Self {
            breakpoints: anchors
                .iter()
                .filter_map(|&(value, [r, g, b])| {
                    Breakpoint::try_from((value, RgbaColor::new(r, g, b, 255))).ok()
                })
                .collect(),
        }
    }

    /// Resolves a gradient by name, e.g. `"purples"` or `"viridis"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use plotml::colors::Colormap;
    ///
    /// assert!(Colormap::from_name("Purples").is_ok());
    /// assert!(Colormap::from_name("jet").is_err());
    /// ```
    pub fn from_name(name: &str) -> Result<Self> {
        let resolved = ColormapName::from_str(name)
            .map_err(|_| error::UnknownColormapSnafu { name }.build())?;
        Ok(Self::named(resolved))
    }

    /// Returns the minimum value that is covered by this colormap
    pub fn min_value(&self) -> f64 {
        *self.breakpoints[0].value
    }

    /// Returns the maximum value that is covered by this colormap
    pub fn max_value(&self) -> f64 {
        *self.breakpoints[self.breakpoints.len() - 1].value
    }

    /// Creates a function for mapping values to colors
    ///
    /// # Examples
    ///
    /// ```
    /// use plotml::colors::{Breakpoint, Colormap, RgbaColor};
    ///
    /// let colormap = Colormap::linear_gradient(vec![
    ///     (0.0, RgbaColor::black()).try_into().unwrap(),
    ///     (1.0, RgbaColor::white()).try_into().unwrap(),
    /// ]).unwrap();
    ///
    /// let mapper = colormap.create_color_mapper();
    ///
    /// assert_eq!(mapper.call(0.5), RgbaColor::new(128, 128, 128, 255));
    /// ```
    pub fn create_color_mapper(&self) -> ColorMapper {
        const COLOR_TABLE_SIZE: usize = 256;

        let (min_value, max_value) = (self.min_value(), self.max_value());

        ColorMapper {
            color_table: self.color_table(COLOR_TABLE_SIZE, min_value, max_value),
            min_value,
            max_value,
        }
    }

    /// Creates a color table of `number_of_colors` colors by linearly
    /// interpolating between the breakpoints
    fn color_table(&self, number_of_colors: usize, min: f64, max: f64) -> Vec<RgbaColor> {
        let smallest_breakpoint_value = self.min_value();
        let largest_breakpoint_value = self.max_value();

        let first_color = self.breakpoints[0].color;
        let last_color = self.breakpoints[self.breakpoints.len() - 1].color;

        let step = (max - min) / ((number_of_colors - 1) as f64);

        let mut breakpoint_iter = self.breakpoints.iter();
        let mut breakpoint_prev = breakpoint_iter.next().expect("must have first entry");
        let mut breakpoint_next = breakpoint_iter.next().expect("must have second entry");

        let color_table: Vec<RgbaColor> = std::iter::successors(Some(min), |v| Some(v + step))
            .take(number_of_colors)
            .map(|value| {
                if value < smallest_breakpoint_value {
                    first_color // rounding errors below the first breakpoint
                } else if value > largest_breakpoint_value {
                    last_color // rounding errors above the last breakpoint
                } else {
                    while value > *breakpoint_next.value {
                        breakpoint_prev = breakpoint_next;
                        breakpoint_next = breakpoint_iter
                            .next()
                            .expect("if-condition must ensure this");
                    }

                    let prev_value = *breakpoint_prev.value;
                    let next_value = *breakpoint_next.value;

                    let fraction = (value - prev_value) / (next_value - prev_value);

                    breakpoint_prev
                        .color
                        .factor_add(breakpoint_next.color, fraction)
                }
            })
            .collect();

        debug_assert_eq!(color_table.len(), number_of_colors);

        color_table
    }
}

/// A `ColorMapper` is a function for mapping values to colors via a
/// precomputed color table
#[derive(Clone, Debug)]
pub struct ColorMapper {
    color_table: Vec<RgbaColor>,
    min_value: f64,
    max_value: f64,
}

impl ColorMapper {
    /// Map a value to a color of the gradient.
    /// Values outside the domain are clamped to the end colors.
    pub fn call(&self, value: f64) -> RgbaColor {
        let value = value.clamp(self.min_value, self.max_value);
        if value.is_nan() {
            return self.color_table[0];
        }

        let color_table_factor = (self.color_table.len() - 1) as f64;
        let table_entry = f64::round(
            color_table_factor * ((value - self.min_value) / (self.max_value - self.min_value)),
        ) as usize;

        self.color_table
            .get(table_entry)
            .copied()
            .unwrap_or(RgbaColor::black())
    }
}

/// A container type for breakpoints that specify a value to color mapping
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Breakpoint {
    pub value: NotNan<f64>,
    pub color: RgbaColor,
}

impl From<(NotNan<f64>, RgbaColor)> for Breakpoint {
    fn from(tuple: (NotNan<f64>, RgbaColor)) -> Self {
        Self {
            value: tuple.0,
            color: tuple.1,
        }
    }
}

impl TryFrom<(f64, RgbaColor)> for Breakpoint {
    type Error = FloatIsNan;

    fn try_from(tuple: (f64, RgbaColor)) -> Result<Self, Self::Error> {
        Ok(Self {
            value: NotNan::new(tuple.0)?,
            color: tuple.1,
        })
    }
}

/// A list of (value, color) tuples, ordered ascending with at least two entries.
pub type Breakpoints = Vec<Breakpoint>;

/// `RgbaColor` defines a 32 bit RGB color with alpha value
#[derive(Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub struct RgbaColor([u8; 4]);

impl RgbaColor {
    /// Creates a new color from red, green, blue and alpha values
    ///
    /// # Examples
    ///
    /// ```
    /// use plotml::colors::RgbaColor;
    ///
    /// assert_eq!(RgbaColor::new(0, 0, 0, 255), RgbaColor::black());
    /// assert_eq!(RgbaColor::new(255, 255, 255, 255), RgbaColor::white());
    /// ```
    pub fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        RgbaColor([red, green, blue, alpha])
    }

    pub fn black() -> Self {
        RgbaColor::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        RgbaColor::new(255, 255, 255, 255)
    }

    pub fn channels(self) -> [u8; 4] {
        self.0
    }

    /// Adds another color with a factor in [0, 1] to this color.
    /// The current color remains in (1 - factor)
    ///
    /// # Example
    ///
    /// ```
    /// use plotml::colors::RgbaColor;
    ///
    /// assert_eq!(RgbaColor::black().factor_add(RgbaColor::white(), 0.5), RgbaColor::new(128, 128, 128, 255));
    /// ```
    pub fn factor_add(self, other: Self, factor: f64) -> Self {
        debug_assert!((0. ..=1.).contains(&factor));

        let [r, g, b, a] = self.0;
        let [r2, g2, b2, a2] = other.0;

        RgbaColor([
            f64::round((1. - factor) * f64::from(r) + factor * f64::from(r2)).clamp(0., 255.) as u8,
            f64::round((1. - factor) * f64::from(g) + factor * f64::from(g2)).clamp(0., 255.) as u8,
            f64::round((1. - factor) * f64::from(b) + factor * f64::from(b2)).clamp(0., 255.) as u8,
            f64::round((1. - factor) * f64::from(a) + factor * f64::from(a2)).clamp(0., 255.) as u8,
        ])
    }
}

impl From<RgbaColor> for image::Rgba<u8> {
    /// Transform an `RgbaColor` to its counterpart from the image crate
    fn from(color: RgbaColor) -> Self {
        // [r, g, b, a]
        image::Rgba(color.0)
    }
}
