use crate::error;
use crate::util::Result;
use fontdue::{Font, FontSettings};

/// Well-known sans-serif font locations, tried in order.
const FONT_PATHS: &[&str] = &[
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/liberation2/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/gnu-free/FreeSans.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/local/share/fonts/DejaVuSans.ttf",
    // macOS
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Helvetica.ttf",
    "/Library/Fonts/Arial.ttf",
];

/// Loads the first usable sans-serif font from the system font directories.
///
/// # Errors
///
/// Fails with `Error::NoFontAvailable` if none of the probed paths yields a
/// parseable font.
pub fn system_font() -> Result<Font> {
    for path in FONT_PATHS {
        let Ok(data) = std::fs::read(path) else {
            continue;
        };
        if let Ok(font) = Font::from_bytes(data, FontSettings::default()) {
            return Ok(font);
        }
    }

    #[cfg(target_os = "windows")]
    if let Ok(windows_dir) = std::env::var("WINDIR") {
        for file in ["arial.ttf", "segoeui.ttf", "calibri.ttf"] {
            let Ok(data) = std::fs::read(format!("{windows_dir}\\Fonts\\{file}")) else {
                continue;
            };
            if let Ok(font) = Font::from_bytes(data, FontSettings::default()) {
                return Ok(font);
            }
        }
    }

    error::NoFontAvailableSnafu.fail()
}

/// Parses a font from raw TTF/OTF bytes, for callers that bundle their own.
pub fn font_from_bytes(data: Vec<u8>) -> Result<Font> {
    Font::from_bytes(data, FontSettings::default())
        .map_err(|details| error::FontSnafu { details }.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn garbage_bytes_are_not_a_font() {
        let result = font_from_bytes(vec![0xde, 0xad, 0xbe, 0xef]);

        assert!(matches!(result, Err(Error::Font { .. })));
    }
}
