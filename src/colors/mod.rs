mod colormap;

pub use colormap::{Breakpoint, Breakpoints, ColorMapper, Colormap, ColormapName, RgbaColor};
