pub mod chart;
pub mod dataset;
pub mod output;
pub mod theme;

pub use chart::{Annotation, Bar, ChartSpec, Highlight, HighlightTarget};
pub use dataset::{BenchmarkData, BenchmarkDataset, Series};
pub use theme::Theme;
