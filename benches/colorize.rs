use criterion::{Criterion, black_box, criterion_group, criterion_main};
use plotml::colors::{Colormap, ColormapName};
use plotml::eval::ConfusionMatrix;
use plotml::plots::{ConfusionMatrixPlot, DEFAULT_HEIGHT, DEFAULT_WIDTH, RenderOptions};
use plotml::util::test::RecordingCanvas;

fn color_mapping(c: &mut Criterion) {
    let mapper = Colormap::named(ColormapName::Purples).create_color_mapper();

    c.bench_function("color_mapper call", |b| {
        b.iter(|| black_box(mapper.call(black_box(0.37))))
    });

    c.bench_function("color_mapper creation", |b| {
        let colormap = Colormap::named(ColormapName::Viridis);
        b.iter(|| black_box(colormap.create_color_mapper()))
    });
}

fn draw_commands(c: &mut Criterion) {
    let matrix = ConfusionMatrix::new(
        vec![vec![293, 78, 94], vec![60, 265, 141], vec![59, 205, 201]],
        vec!["Label1".into(), "Label2".into(), "Label3".into()],
    )
    .expect("matrix is square");
    let plot = ConfusionMatrixPlot::new(matrix, RenderOptions::default());

    c.bench_function("confusion matrix draw", |b| {
        b.iter(|| {
            let mut canvas = RecordingCanvas::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
            plot.draw(&mut canvas).expect("row sums are positive");
            black_box(canvas.commands.len())
        })
    });
}

criterion_group!(benches, color_mapping, draw_commands);
criterion_main!(benches);
