mod confusion_matrix;

pub use confusion_matrix::{
    ConfusionMatrixPlot, DEFAULT_HEIGHT, DEFAULT_WIDTH, RenderOptions,
};
