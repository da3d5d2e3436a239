//! Presentation layer: display helpers, the page view-model and its text rendering.

pub mod display;
pub mod text;
pub mod view;

pub use view::{render, PageView};
