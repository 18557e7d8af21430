//! Numeric utilities shared by the model components
//!
//! Logistic and softmax link functions.

mod link;

pub use link::*;
