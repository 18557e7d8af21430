//! Core types for typed spaces, regimes, parameter layouts, and host buffers

pub mod buffers;
pub mod params;
pub mod regime;
pub mod spaces;
pub mod transforms;
