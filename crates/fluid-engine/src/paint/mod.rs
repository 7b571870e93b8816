//! Paint model shared between the glass layer and renderers.
//!
//! Scope is deliberately narrow: a linear color type plus parsing of the
//! `#rrggbb` literals used by material parameters.

pub mod color;

pub use color::{Color, ColorParseError};
