use plotml::canvas::system_font;
use plotml::eval::ConfusionMatrix;
use plotml::plots::{ConfusionMatrixPlot, DEFAULT_HEIGHT, DEFAULT_WIDTH, RenderOptions};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn example_plot(normalize: bool) -> ConfusionMatrixPlot {
    let matrix = ConfusionMatrix::new(
        vec![vec![293, 78, 94], vec![60, 265, 141], vec![59, 205, 201]],
        vec!["Label1".into(), "Label2".into(), "Label3".into()],
    )
    .unwrap();

    ConfusionMatrixPlot::new(matrix, RenderOptions::default().with_normalize(normalize))
}

#[test]
fn renders_png_bytes() {
    // hosts without fonts cannot exercise the pixel backend
    if system_font().is_err() {
        return;
    }

    let bytes = example_plot(false)
        .to_png(DEFAULT_WIDTH, DEFAULT_HEIGHT)
        .unwrap();

    assert_eq!(bytes[..8], PNG_SIGNATURE);
}

#[test]
fn writes_png_file() {
    if system_font().is_err() {
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("confusion_matrix.png");

    example_plot(true)
        .write_png(&path, DEFAULT_WIDTH, DEFAULT_HEIGHT)
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes[..8], PNG_SIGNATURE);
}

#[test]
fn rendering_is_deterministic() {
    if system_font().is_err() {
        return;
    }

    let plot = example_plot(false);

    let first = plot.to_png(400, 350).unwrap();
    let second = plot.to_png(400, 350).unwrap();

    assert_eq!(first, second);
}
