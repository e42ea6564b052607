pub mod pointer;

pub use pointer::{CellMetrics, PointerDriver};
