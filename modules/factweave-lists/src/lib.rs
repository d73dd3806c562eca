//! Ranked "top N" list generation with optional image enrichment.

pub mod generator;
pub mod images;
pub mod prompts;

pub use generator::{ListGenerator, ListRequest, DEFAULT_COUNT};
pub use images::{ImageEnricher, ImageSource, WebImageSource};
