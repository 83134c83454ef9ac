use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Invalid input: {}", details))]
    InvalidInput {
        details: String,
    },

    #[snafu(display("Row {} of the confusion matrix sums to zero", row))]
    DegenerateInput {
        row: usize,
    },

    #[snafu(display("Unknown colormap \"{}\"", name))]
    UnknownColormap {
        name: String,
    },

    #[snafu(display("Invalid colormap: {}", details))]
    Colormap {
        details: &'static str,
    },

    #[snafu(display("No usable font found on this system"))]
    NoFontAvailable,

    #[snafu(display("Unable to load font: {}", details))]
    Font {
        details: String,
    },

    #[snafu(display("Unable to encode image: {}", source))]
    ImageEncoding {
        source: image::ImageError,
    },

    #[snafu(display("Unable to write image file: {}", source))]
    ImageFile {
        source: std::io::Error,
    },
}
