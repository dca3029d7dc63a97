//! Theme Module
//!
//! Color constants and frame builders shared by the views.

pub mod colors;
pub mod styles;

pub use colors::*;
pub use styles::*;
