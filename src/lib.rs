pub mod canvas;
pub mod colors;
pub mod error;
pub mod eval;
pub mod plots;
pub mod util;
